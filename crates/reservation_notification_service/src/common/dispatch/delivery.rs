/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::common::types::*;
use crate::outbound::{external::send_fcm_message, types::FcmErrorResp};
use crate::tools::callapi::CallAPIError;

/// Hands a composed message to a push backend. Never fails: every result is an outcome.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send(&self, payload: NotificationPayload) -> DeliveryOutcome;
}

pub struct FcmDeliveryClient {
    client: Client,
    fcm_url: Url,
    access_token: String,
}

impl FcmDeliveryClient {
    pub fn new(
        fcm_url: Url,
        access_token: String,
        delivery_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(delivery_timeout).build()?;
        Ok(Self {
            client,
            fcm_url,
            access_token,
        })
    }
}

#[async_trait]
impl DeliveryClient for FcmDeliveryClient {
    async fn send(&self, payload: NotificationPayload) -> DeliveryOutcome {
        match send_fcm_message(&self.client, &self.fcm_url, &self.access_token, payload).await {
            Ok(resp) => DeliveryOutcome::Success(MessageId(resp.name)),
            Err(err) => classify_call_error(err),
        }
    }
}

fn classify_call_error(err: CallAPIError) -> DeliveryOutcome {
    let reason = match &err {
        CallAPIError::ExternalAPICallError { status, body } => {
            return DeliveryOutcome::Failure {
                reason: classify_failure(*status, body),
                detail: body.to_owned(),
            }
        }
        CallAPIError::RequestTimeout | CallAPIError::ConnectionError(_) => {
            DeliveryFailureReason::BackendUnavailable
        }
        CallAPIError::InvalidRequest(_)
        | CallAPIError::SerializationError(_)
        | CallAPIError::DeserializationError(_) => DeliveryFailureReason::Unknown,
    };
    DeliveryOutcome::Failure {
        reason,
        detail: err.to_string(),
    }
}

/// Maps a non-success FCM response to a failure reason.
///
/// The most specific signal wins: an FCM error code in `details`, then the canonical
/// `error.status`, then the bare HTTP status.
pub fn classify_failure(status: u16, body: &str) -> DeliveryFailureReason {
    if let Ok(FcmErrorResp { error }) = serde_json::from_str::<FcmErrorResp>(body) {
        let by_error_code = error
            .details
            .iter()
            .filter_map(|detail| detail.error_code.as_deref())
            .find_map(|error_code| match error_code {
                "UNREGISTERED" | "INVALID_ARGUMENT" | "SENDER_ID_MISMATCH" => {
                    Some(DeliveryFailureReason::InvalidToken)
                }
                "QUOTA_EXCEEDED" => Some(DeliveryFailureReason::QuotaExceeded),
                "UNAVAILABLE" | "INTERNAL" => Some(DeliveryFailureReason::BackendUnavailable),
                _ => None,
            });
        if let Some(reason) = by_error_code {
            return reason;
        }

        match error.status.as_deref() {
            Some("NOT_FOUND") => return DeliveryFailureReason::InvalidToken,
            Some("RESOURCE_EXHAUSTED") => return DeliveryFailureReason::QuotaExceeded,
            Some("UNAVAILABLE") | Some("INTERNAL") => {
                return DeliveryFailureReason::BackendUnavailable
            }
            _ => {}
        }
    }

    match status {
        404 => DeliveryFailureReason::InvalidToken,
        429 => DeliveryFailureReason::QuotaExceeded,
        500 | 502 | 503 | 504 => DeliveryFailureReason::BackendUnavailable,
        _ => DeliveryFailureReason::Unknown,
    }
}
