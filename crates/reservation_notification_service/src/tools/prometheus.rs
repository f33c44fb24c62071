/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::{
    opts, register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

pub static INCOMING_API: once_cell::sync::Lazy<HistogramVec> = once_cell::sync::Lazy::new(|| {
    register_histogram_vec!(
        opts!("http_request_duration_seconds", "Incoming API requests").into(),
        &["method", "handler", "status_code", "code", "version"]
    )
    .expect("Failed to register incoming API metrics")
});

pub static CALL_EXTERNAL_API: once_cell::sync::Lazy<HistogramVec> =
    once_cell::sync::Lazy::new(|| {
        register_histogram_vec!(
            opts!("external_request_duration", "Call external API requests").into(),
            &["method", "host", "service", "status"]
        )
        .expect("Failed to register call external API metrics")
    });

pub static DISPATCH_OUTCOMES: once_cell::sync::Lazy<IntCounterVec> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter_vec!(
            opts!("dispatch_outcomes", "Terminal states of reservation dispatches"),
            &["state", "reason"]
        )
        .expect("Failed to register dispatch outcome metrics")
    });

/// Macro that observes the duration of incoming API requests and logs metrics related to the request.
///
/// # Arguments
///
/// * `$method` - The HTTP method of the request (e.g., GET, POST).
/// * `$endpoint` - The endpoint or route of the request.
/// * `$status` - The HTTP status code of the response.
/// * `$code` - The error code of the response, or `SUCCESS`.
/// * `$start` - The time when the request was received.
#[macro_export]
macro_rules! incoming_api {
    ($method:expr, $endpoint:expr, $status:expr, $code:expr, $start:expr) => {
        let duration = $start.elapsed().as_secs_f64();
        let version = std::env::var("DEPLOYMENT_VERSION").unwrap_or("DEV".to_string());
        INCOMING_API
            .with_label_values(&[$method, $endpoint, $status, $code, version.as_str()])
            .observe(duration);
    };
}

/// Macro that observes the duration of external API calls.
///
/// # Arguments
///
/// * `$method` - The HTTP method of the external request.
/// * `$host` - The host or domain of the external service.
/// * `$path` - The path or endpoint of the external service.
/// * `$status` - The HTTP status code of the response from the external service.
/// * `$start` - The time when the external request was initiated.
#[macro_export]
macro_rules! call_external_api {
    ($method:expr, $host:expr, $path:expr, $status:expr, $start:expr) => {
        let duration = $start.elapsed().as_secs_f64();
        CALL_EXTERNAL_API
            .with_label_values(&[$method, $host, $path, $status])
            .observe(duration);
    };
}

/// Counts one finished dispatch by terminal state and reason.
#[macro_export]
macro_rules! dispatch_outcome {
    ($state:expr, $reason:expr) => {
        DISPATCH_OUTCOMES
            .with_label_values(&[$state, $reason])
            .inc();
    };
}

/// Initializes and returns a `PrometheusMetrics` instance configured for the application.
///
/// It also provides an endpoint (`/metrics`) for Prometheus to scrape these metrics.
///
/// # Panics
///
/// * If there's a failure initializing metrics or registering them to the Prometheus registry.
pub fn prometheus_metrics() -> PrometheusMetrics {
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus Metrics");

    prometheus
        .registry
        .register(Box::new(INCOMING_API.to_owned()))
        .expect("Failed to register incoming API metrics");

    prometheus
        .registry
        .register(Box::new(CALL_EXTERNAL_API.to_owned()))
        .expect("Failed to register call external API metrics");

    prometheus
        .registry
        .register(Box::new(DISPATCH_OUTCOMES.to_owned()))
        .expect("Failed to register dispatch outcome metrics");

    prometheus
}
