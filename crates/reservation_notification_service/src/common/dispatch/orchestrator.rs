/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::{composer::compose, delivery::DeliveryClient, directory::TokenDirectory};
use crate::common::types::*;
use crate::dispatch_outcome;
use crate::tools::{error::AppError, prometheus::DISPATCH_OUTCOMES};

/// Runs one reservation event through lookup, composition and delivery.
///
/// Stateless between events; collaborators are shared read-only across concurrent dispatches.
/// Delivery is attempted at most once per call.
#[derive(Clone)]
pub struct Dispatcher {
    token_directory: Arc<dyn TokenDirectory>,
    delivery_client: Arc<dyn DeliveryClient>,
}

impl Dispatcher {
    pub fn new(
        token_directory: Arc<dyn TokenDirectory>,
        delivery_client: Arc<dyn DeliveryClient>,
    ) -> Self {
        Self {
            token_directory,
            delivery_client,
        }
    }

    pub fn token_directory(&self) -> &Arc<dyn TokenDirectory> {
        &self.token_directory
    }

    /// `Ok` for every terminal state, including `NoToken` and `DeliveryFailed`.
    /// `Err` only when the token directory itself could not answer, in which case nothing
    /// was sent.
    pub async fn dispatch(&self, event: ReservationEvent) -> Result<DispatchReport, AppError> {
        let outcome = match self.resolve_token(&event.recipient_id).await? {
            Err(reason) => DispatchOutcome::NoToken { reason },
            Ok(token) => {
                let payload = compose(&event, token);
                match self.delivery_client.send(payload).await {
                    DeliveryOutcome::Success(message_id) => {
                        DispatchOutcome::Delivered { message_id }
                    }
                    DeliveryOutcome::Failure { reason, detail } => {
                        DispatchOutcome::DeliveryFailed { reason, detail }
                    }
                }
            }
        };

        let report = DispatchReport {
            reservation_id: event.reservation_id,
            recipient_id: event.recipient_id,
            plan_id: event.plan_id,
            outcome,
            dispatched_at: Utc::now(),
        };

        log_report(&report);
        dispatch_outcome!(report.outcome.state(), report.outcome.reason());

        Ok(report)
    }

    /// Outer `Err` is a directory failure, inner `Err` a normal "nothing to deliver to".
    async fn resolve_token(
        &self,
        recipient_id: &RecipientId,
    ) -> Result<Result<DeliveryToken, NoTokenReason>, AppError> {
        match self.token_directory.lookup(recipient_id).await {
            Ok(RecipientRecord {
                delivery_token: None,
                ..
            }) => Ok(Err(NoTokenReason::TokenMissing)),
            Ok(RecipientRecord {
                delivery_token: Some(token),
                ..
            }) => Ok(DeliveryToken::new(&token).ok_or(NoTokenReason::TokenEmpty)),
            Err(AppError::RecipientNotFound(_)) => Ok(Err(NoTokenReason::RecipientNotFound)),
            Err(err) => {
                error!(tag = "[Dispatch - Directory Unavailable]", recipient_id = %recipient_id.0, error = %err.message());
                Err(match err {
                    AppError::TokenDirectoryUnavailable(_) => err,
                    err => AppError::TokenDirectoryUnavailable(err.message()),
                })
            }
        }
    }
}

fn log_report(report: &DispatchReport) {
    let DispatchReport {
        reservation_id: ReservationId(reservation_id),
        recipient_id: RecipientId(recipient_id),
        plan_id: PlanId(plan_id),
        outcome,
        ..
    } = report;

    match outcome {
        DispatchOutcome::NoToken { reason } => {
            info!(tag = "[Dispatch - NoToken]", %reservation_id, %recipient_id, %plan_id, %reason, "No delivery token for recipient");
        }
        DispatchOutcome::Delivered {
            message_id: MessageId(message_id),
        } => {
            info!(tag = "[Dispatch - Delivered]", %reservation_id, %recipient_id, %plan_id, %message_id, "Notification delivered");
        }
        DispatchOutcome::DeliveryFailed { reason, detail } => {
            warn!(tag = "[Dispatch - DeliveryFailed]", %reservation_id, %recipient_id, %plan_id, %reason, %detail, "Notification delivery failed");
        }
    }
}
