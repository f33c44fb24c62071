/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use reservation_notification_service::{
    common::{
        dispatch::{DeliveryClient, Dispatcher, TokenDirectory},
        types::*,
    },
    tools::error::AppError,
};

pub enum StoredRecipient {
    WithToken(String),
    WithoutToken,
}

/// In-memory token directory. Recipients not stored are not found; `unavailable` makes every
/// lookup fail as if the backend were down.
#[derive(Default)]
pub struct FakeTokenDirectory {
    recipients: HashMap<String, StoredRecipient>,
    unavailable: bool,
    lookups: AtomicUsize,
}

impl FakeTokenDirectory {
    pub fn with_recipient(mut self, recipient_id: &str, recipient: StoredRecipient) -> Self {
        self.recipients.insert(recipient_id.to_string(), recipient);
        self
    }

    pub fn unavailable() -> Self {
        FakeTokenDirectory {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenDirectory for FakeTokenDirectory {
    async fn lookup(&self, recipient_id: &RecipientId) -> Result<RecipientRecord, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(AppError::TokenDirectoryUnavailable(
                "connection refused".to_string(),
            ));
        }

        match self.recipients.get(&recipient_id.0) {
            Some(StoredRecipient::WithToken(token)) => Ok(RecipientRecord {
                recipient_id: recipient_id.to_owned(),
                delivery_token: Some(token.to_owned()),
            }),
            Some(StoredRecipient::WithoutToken) => Ok(RecipientRecord {
                recipient_id: recipient_id.to_owned(),
                delivery_token: None,
            }),
            None => Err(AppError::RecipientNotFound(recipient_id.0.to_owned())),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.unavailable {
            Err(AppError::RedisConnectionError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Records every payload it is handed and answers with a fixed outcome.
pub struct FakeDeliveryClient {
    outcome: DeliveryOutcome,
    sent: Mutex<Vec<NotificationPayload>>,
}

impl FakeDeliveryClient {
    pub fn answering(outcome: DeliveryOutcome) -> Self {
        FakeDeliveryClient {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn delivering(message_id: &str) -> Self {
        Self::answering(DeliveryOutcome::Success(MessageId(message_id.to_string())))
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryClient for FakeDeliveryClient {
    async fn send(&self, payload: NotificationPayload) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(payload);
        self.outcome.clone()
    }
}

pub fn dispatcher(
    token_directory: &Arc<FakeTokenDirectory>,
    delivery_client: &Arc<FakeDeliveryClient>,
) -> Dispatcher {
    Dispatcher::new(token_directory.clone(), delivery_client.clone())
}

pub fn event(reservation_id: &str, recipient_id: &str, plan_id: &str) -> ReservationEvent {
    ReservationEvent {
        reservation_id: ReservationId(reservation_id.to_string()),
        recipient_id: RecipientId(recipient_id.to_string()),
        plan_id: PlanId(plan_id.to_string()),
    }
}
