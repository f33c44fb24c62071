/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ReservationId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct RecipientContainerId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct RecipientId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct PlanId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct MessageId(pub String);

/// Opaque token issued by the push backend for one installed app instance.
///
/// Never empty: the only constructor trims the input and rejects blank strings. `Debug` does
/// not print the token, so payloads can be logged as they are.
#[derive(Serialize, Clone, Eq, PartialEq)]
#[serde(transparent)]
pub struct DeliveryToken(String);

impl fmt::Debug for DeliveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeliveryToken(<redacted>)")
    }
}

impl DeliveryToken {
    pub fn new(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(DeliveryToken(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Event key and document body of one creation notification, as handed over by the host.
#[derive(Debug, Clone)]
pub struct RawReservationEvent {
    pub recipient_container_id: RecipientContainerId,
    pub reservation_id: ReservationId,
    pub document: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationEvent {
    pub reservation_id: ReservationId,
    pub recipient_id: RecipientId,
    pub plan_id: PlanId,
}

/// What the token directory knows about a recipient. `delivery_token` is absent until the
/// app registered a device, which is a normal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientRecord {
    pub recipient_id: RecipientId,
    pub delivery_token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Push message in the wire shape of the delivery backend: `{ notification: { title, body }, token }`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NotificationPayload {
    pub notification: Notification,
    pub token: DeliveryToken,
}

#[derive(
    Debug, Clone, Copy, Display, IntoStaticStr, Serialize, Deserialize, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryFailureReason {
    InvalidToken,
    BackendUnavailable,
    QuotaExceeded,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success(MessageId),
    Failure {
        reason: DeliveryFailureReason,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, Display, IntoStaticStr, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NoTokenReason {
    RecipientNotFound,
    TokenMissing,
    TokenEmpty,
}

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum DispatchOutcome {
    NoToken {
        reason: NoTokenReason,
    },
    Delivered {
        #[serde(rename = "messageId")]
        message_id: MessageId,
    },
    DeliveryFailed {
        reason: DeliveryFailureReason,
        detail: String,
    },
}

impl DispatchOutcome {
    pub fn state(&self) -> &'static str {
        match self {
            DispatchOutcome::NoToken { .. } => "NoToken",
            DispatchOutcome::Delivered { .. } => "Delivered",
            DispatchOutcome::DeliveryFailed { .. } => "DeliveryFailed",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            DispatchOutcome::NoToken { reason } => (*reason).into(),
            DispatchOutcome::Delivered { .. } => "NONE",
            DispatchOutcome::DeliveryFailed { reason, .. } => (*reason).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub reservation_id: ReservationId,
    pub recipient_id: RecipientId,
    pub plan_id: PlanId,
    pub outcome: DispatchOutcome,
    pub dispatched_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseData {
    pub result: String,
}
