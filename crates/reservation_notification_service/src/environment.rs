/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use std::{sync::Arc, time::Duration};

use crate::{
    common::dispatch::{Dispatcher, FcmDeliveryClient, RedisTokenDirectory},
    redis::types::{RedisConnectionPool, RedisSettings},
    tools::logger::LoggerConfig,
};
use rdkafka::{error::KafkaError, producer::FutureProducer, ClientConfig};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub workers: usize,
    pub logger_cfg: LoggerConfig,
    pub redis_cfg: RedisConfig,
    pub kafka_cfg: KafkaConfig,
    pub dispatch_report_topic: String,
    pub fcm_cfg: FcmConfig,
    pub event_api_key: String,
    pub request_timeout: u64,
    pub log_unprocessible_req_body: Vec<String>,
    pub max_allowed_req_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KafkaConfig {
    pub kafka_key: String,
    pub kafka_host: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedisConfig {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_pool_size: usize,
    pub redis_partition: usize,
    pub reconnect_max_attempts: u32,
    pub reconnect_delay: u32,
    pub default_ttl: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FcmConfig {
    pub fcm_url: String,
    pub fcm_access_token: String,
    pub delivery_timeout_ms: u64,
}

impl From<RedisConfig> for RedisSettings {
    fn from(redis_cfg: RedisConfig) -> Self {
        RedisSettings {
            host: redis_cfg.redis_host,
            port: redis_cfg.redis_port,
            partition: redis_cfg.redis_partition,
            pool_size: redis_cfg.redis_pool_size,
            reconnect_max_attempts: redis_cfg.reconnect_max_attempts,
            reconnect_delay: redis_cfg.reconnect_delay,
            default_ttl: redis_cfg.default_ttl,
            ..RedisSettings::default()
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub producer: Option<FutureProducer>,
    pub dispatch_report_topic: String,
    pub event_api_key: String,
    pub max_allowed_req_size: usize,
    pub log_unprocessible_req_body: Vec<String>,
    pub request_timeout: u64,
}

impl AppState {
    pub async fn new(app_config: AppConfig) -> AppState {
        let redis = Arc::new(
            RedisConnectionPool::new(app_config.redis_cfg.into())
                .await
                .expect("Failed to create Token Directory Redis connection pool"),
        );

        let fcm_url =
            Url::parse(app_config.fcm_cfg.fcm_url.as_str()).expect("Failed to parse fcm_url.");

        let delivery_client = FcmDeliveryClient::new(
            fcm_url,
            app_config.fcm_cfg.fcm_access_token,
            Duration::from_millis(app_config.fcm_cfg.delivery_timeout_ms),
        )
        .expect("Failed to build FCM http client");

        let dispatcher = Dispatcher::new(
            Arc::new(RedisTokenDirectory::new(redis)),
            Arc::new(delivery_client),
        );

        let producer: Option<FutureProducer>;

        let result: Result<FutureProducer, KafkaError> = ClientConfig::new()
            .set(
                app_config.kafka_cfg.kafka_key,
                app_config.kafka_cfg.kafka_host,
            )
            .set("compression.type", "lz4")
            .create();

        match result {
            Ok(val) => {
                producer = Some(val);
            }
            Err(err) => {
                producer = None;
                info!(
                    tag = "[Kafka Connection]",
                    "Error connecting to kafka config: {err}"
                );
            }
        }

        AppState {
            dispatcher: Arc::new(dispatcher),
            producer,
            dispatch_report_topic: app_config.dispatch_report_topic,
            event_api_key: app_config.event_api_key,
            max_allowed_req_size: app_config.max_allowed_req_size,
            log_unprocessible_req_body: app_config.log_unprocessible_req_body,
            request_timeout: app_config.request_timeout,
        }
    }
}

impl AppConfig {
    /// A request must outlive the push it waits on. Otherwise the caller sees a timeout for an
    /// event whose push may still be delivered, and its redelivery pushes twice.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout <= self.fcm_cfg.delivery_timeout_ms {
            return Err(format!(
                "request_timeout ({}ms) must be greater than fcm_cfg.delivery_timeout_ms ({}ms)",
                self.request_timeout, self.fcm_cfg.delivery_timeout_ms
            ));
        }
        Ok(())
    }
}
