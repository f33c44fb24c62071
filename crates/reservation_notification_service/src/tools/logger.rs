/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use serde::Deserialize;
use tracing::subscriber::set_global_default;
pub use tracing::{debug, error, info, instrument, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, Registry};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
    OFF,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::TRACE => LevelFilter::TRACE,
            LogLevel::DEBUG => LevelFilter::DEBUG,
            LogLevel::INFO => LevelFilter::INFO,
            LogLevel::WARN => LevelFilter::WARN,
            LogLevel::ERROR => LevelFilter::ERROR,
            LogLevel::OFF => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub log_to_file: bool,
    pub log_dir: String,
}

/// Guards of the non-blocking writers. Dropping them flushes and stops the writers, so the
/// value returned by [`setup_tracing`] must live as long as the process.
pub struct LoggerGuards {
    _console: WorkerGuard,
    _file: Option<WorkerGuard>,
}

/// Sets up the application-wide logging/tracing using the provided configuration.
///
/// Every line is Bunyan-formatted JSON named after the crate and its version. Console output
/// is always on; a daily rolling file under `log_dir` is added when `log_to_file` is set.
/// Records emitted through the `log` crate by dependencies are bridged into `tracing`.
///
/// # Panics
///
/// * If the `log` bridge or the global subscriber was already installed.
pub fn setup_tracing(logger_cfg: &LoggerConfig) -> LoggerGuards {
    LogTracer::init().expect("Failed to setup logger");

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();

    let (console_writer, console_guard) = tracing_appender::non_blocking(std::io::stdout());
    let console_layer = BunyanFormattingLayer::new(app_name.to_owned(), console_writer);

    let (file_layer, file_guard) = if logger_cfg.log_to_file {
        let rolling_writer = tracing_appender::rolling::daily(
            logger_cfg.log_dir.as_str(),
            format!("{app_name}.log"),
        );
        let (file_writer, file_guard) = tracing_appender::non_blocking(rolling_writer);
        (
            Some(BunyanFormattingLayer::new(app_name.to_owned(), file_writer)),
            Some(file_guard),
        )
    } else {
        (None, None)
    };

    let subscriber = Registry::default()
        .with(LevelFilter::from(logger_cfg.level))
        .with(JsonStorageLayer)
        .with(file_layer)
        .with(console_layer);

    set_global_default(subscriber).expect("Unable to set global tracing subscriber");

    LoggerGuards {
        _console: console_guard,
        _file: file_guard,
    }
}

/// Routes panics of request handlers and background tasks into the structured log instead
/// of raw stderr.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|payload| payload.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or("Unknown panic".to_string());
        let location = panic_info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        error!(tag = "[PANIC]", location = %location, "Panic Occured : {payload}");
    }));
}
