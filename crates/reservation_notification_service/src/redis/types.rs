/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use fred::{
    interfaces::ClientLike,
    prelude::{ReconnectPolicy, RedisConfig, RedisPool},
    types::{Blocking, Builder, RespVersion, TracingConfig},
};
use serde::{Deserialize, Serialize};

use crate::tools::error::AppError;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub partition: usize,
    pub pool_size: usize,
    pub reconnect_max_attempts: u32,
    /// Reconnect delay in milliseconds
    pub reconnect_delay: u32,
    /// TTL in seconds
    pub default_ttl: u32,
    pub use_legacy_version: bool,
}

impl Default for RedisSettings {
    fn default() -> Self {
        RedisSettings {
            host: String::from("localhost"),
            port: 6379,
            partition: 0,
            pool_size: 10,
            reconnect_max_attempts: 5,
            reconnect_delay: 1000,
            default_ttl: 3600,
            use_legacy_version: false,
        }
    }
}

impl RedisSettings {
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.partition)
    }
}

pub struct RedisConnectionPool {
    pub pool: RedisPool,
    pub default_ttl: u32,
}

impl RedisConnectionPool {
    /// Create a new Redis connection pool and wait until every client is connected.
    pub async fn new(conf: RedisSettings) -> Result<Self, AppError> {
        let mut config = RedisConfig::from_url(&conf.connection_url())
            .map_err(|err| AppError::RedisConnectionError(err.to_string()))?;

        if !conf.use_legacy_version {
            config.version = RespVersion::RESP3;
        }
        config.tracing = TracingConfig::new(true);
        config.blocking = Blocking::Error;

        let reconnect_policy =
            ReconnectPolicy::new_constant(conf.reconnect_max_attempts, conf.reconnect_delay);

        let pool = Builder::from_config(config)
            .set_policy(reconnect_policy)
            .build_pool(conf.pool_size)
            .map_err(|err| AppError::RedisConnectionError(err.to_string()))?;

        pool.init()
            .await
            .map_err(|err| AppError::RedisConnectionError(err.to_string()))?;

        Ok(Self {
            pool,
            default_ttl: conf.default_ttl,
        })
    }
}

/// Recipient document as written by the app. Only the token field matters here, every other
/// field of the document is ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDocument {
    #[serde(default)]
    pub fcm_token: Option<String>,
}
