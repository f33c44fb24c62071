/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::common::types::*;
use crate::redis::{
    commands,
    types::{RecipientDocument, RedisConnectionPool},
};
use crate::tools::error::AppError;

/// Read-only view of where each recipient can be reached.
#[async_trait]
pub trait TokenDirectory: Send + Sync {
    /// `Err(AppError::RecipientNotFound)` when no record exists for the recipient. A record
    /// without a token is `Ok` with `delivery_token: None`. Any backend failure is
    /// `Err(AppError::TokenDirectoryUnavailable)`.
    async fn lookup(&self, recipient_id: &RecipientId) -> Result<RecipientRecord, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

pub struct RedisTokenDirectory {
    redis: Arc<RedisConnectionPool>,
}

impl RedisTokenDirectory {
    pub fn new(redis: Arc<RedisConnectionPool>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TokenDirectory for RedisTokenDirectory {
    async fn lookup(&self, recipient_id: &RecipientId) -> Result<RecipientRecord, AppError> {
        let stored = commands::get_recipient_document(&self.redis, recipient_id).await;
        to_recipient_record(recipient_id, stored)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        commands::health_check(&self.redis).await
    }
}

/// A missing document is `RecipientNotFound`. A document that could not be read or decoded
/// makes the directory unavailable for this lookup.
fn to_recipient_record(
    recipient_id: &RecipientId,
    stored: Result<Option<RecipientDocument>, AppError>,
) -> Result<RecipientRecord, AppError> {
    let document = stored
        .map_err(|err| {
            error!(tag = "[Token Directory]", recipient_id = %recipient_id.0, error = %err.message(), "Lookup failed");
            AppError::TokenDirectoryUnavailable(err.message())
        })?
        .ok_or_else(|| AppError::RecipientNotFound(recipient_id.0.to_owned()))?;

    Ok(RecipientRecord {
        recipient_id: recipient_id.to_owned(),
        delivery_token: document.fcm_token,
    })
}
