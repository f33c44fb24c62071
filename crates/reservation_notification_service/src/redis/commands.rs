/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::redis::{keys::*, types::*};
use crate::tools::error::AppError;
use fred::{interfaces::KeysInterface, types::Expiration};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

/// Stored values are JSON documents.
pub fn decode_value<T>(value: &str) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    serde_json::from_str::<T>(value).map_err(|err| AppError::DeserializationError(err.to_string()))
}

impl RedisConnectionPool {
    // get key
    #[instrument(level = "DEBUG", skip(self))]
    pub async fn get_key<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let output: Option<String> = self
            .pool
            .get(key)
            .await
            .map_err(|err| AppError::RedisConnectionError(err.to_string()))?;

        output.map(|value| decode_value::<T>(&value)).transpose()
    }

    // set key with expiry
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn set_with_expiry<T>(&self, key: &str, value: T, expiry: u32) -> Result<(), AppError>
    where
        T: Serialize,
    {
        let value = serde_json::to_string(&value)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        self.pool
            .set::<(), _, _>(key, value, Some(Expiration::EX(expiry.into())), None, false)
            .await
            .map_err(|err| AppError::RedisConnectionError(err.to_string()))
    }

    // set key with the default ttl
    pub async fn set_key<T>(&self, key: &str, value: T) -> Result<(), AppError>
    where
        T: Serialize,
    {
        self.set_with_expiry(key, value, self.default_ttl).await
    }
}

/// Reads the stored document of a recipient. `Ok(None)` when no document exists under its key.
pub async fn get_recipient_document(
    redis: &RedisConnectionPool,
    recipient_id: &RecipientId,
) -> Result<Option<RecipientDocument>, AppError> {
    redis
        .get_key::<RecipientDocument>(&recipient_key(recipient_id))
        .await
}

/// Write then read back a marker key, proving the store answers both ways.
pub async fn health_check(redis: &RedisConnectionPool) -> Result<(), AppError> {
    let key = health_check_key();
    redis.set_key(&key, "rns-health-check").await?;
    match redis.get_key::<String>(&key).await? {
        Some(_) => Ok(()),
        None => Err(AppError::RedisConnectionError(
            "Health check key was not readable".to_string(),
        )),
    }
}
