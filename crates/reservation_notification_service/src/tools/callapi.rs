/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::call_external_api;
use crate::tools::prometheus::CALL_EXTERNAL_API;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::{error, info};

/// Failures of an outgoing API call.
///
/// Kept apart from `AppError` because callers such as the delivery client classify these
/// instead of propagating them.
#[derive(Debug, thiserror::Error)]
pub enum CallAPIError {
    #[error("Invalid Request : {0}")]
    InvalidRequest(String),
    #[error("Serialization Error : {0}")]
    SerializationError(String),
    #[error("Deserialization Error : {0}")]
    DeserializationError(String),
    #[error("External API Call Error : {status} - {body}")]
    ExternalAPICallError { status: u16, body: String },
    #[error("Request Timeout")]
    RequestTimeout,
    #[error("Connection Error : {0}")]
    ConnectionError(String),
}

/// Sends an asynchronous API request through the given client.
///
/// The client is built once at start-up, so its timeout and connection pool apply to every
/// call made through it. Header values are never logged. Request bodies are logged through
/// their `Debug` output, which must leave out any secret the body carries.
///
/// # Returns
///
/// * `Ok(T)` if the request succeeds and the response can be deserialized into type `T`.
/// * `Err(CallAPIError::ExternalAPICallError)` with the status code and raw body for a
///   non-success status, so the caller can inspect structured error bodies.
/// * `Err(CallAPIError::RequestTimeout)` when the client timeout elapsed.
/// * `Err(CallAPIError::ConnectionError)` for any other transport failure.
pub async fn call_api<T, U>(
    client: &Client,
    method: Method,
    url: &Url,
    headers: Vec<(&str, &str)>,
    body: Option<U>,
) -> Result<T, CallAPIError>
where
    T: DeserializeOwned,
    U: Serialize + Debug,
{
    let start_time = std::time::Instant::now();

    let mut header_map = HeaderMap::new();

    for (header_key, header_value) in headers {
        let header_name = HeaderName::from_str(header_key).map_err(|_| {
            CallAPIError::InvalidRequest(format!("Invalid Header Name : {header_key}"))
        })?;
        let header_value = HeaderValue::from_str(header_value).map_err(|_| {
            CallAPIError::InvalidRequest(format!("Invalid Header Value For : {header_key}"))
        })?;

        header_map.insert(header_name, header_value);
    }

    let mut request = client
        .request(method.to_owned(), url.to_owned())
        .headers(header_map);

    if let Some(body) = &body {
        let body = serde_json::to_string(body)
            .map_err(|err| CallAPIError::SerializationError(err.to_string()))?;
        request = request.body(body);
    }

    let resp = request.send().await;

    let url_str = format!(
        "{}://{}:{}",
        url.scheme(),
        url.host_str().unwrap_or(""),
        url.port_or_known_default().unwrap_or(80)
    );

    let status = match resp.as_ref() {
        Ok(resp) => resp.status().as_str().to_string(),
        Err(err) if err.is_timeout() => "TIMEOUT".to_string(),
        Err(err) => err
            .status()
            .map(|status| status.as_str().to_string())
            .unwrap_or("UNKNOWN".to_string()),
    };

    call_external_api!(
        method.as_str(),
        url_str.as_str(),
        url.path(),
        status.as_str(),
        start_time
    );

    match resp {
        Ok(resp) => {
            let status = resp.status();
            if status.is_success() {
                info!(tag = "[OUTGOING API]", request_method = %method, request_body = format!("{:?}", body), request_url = %url_str, response_status = status.as_str(), latency = format!("{:?}ms", start_time.elapsed().as_millis()));
                resp.json::<T>()
                    .await
                    .map_err(|err| CallAPIError::DeserializationError(err.to_string()))
            } else {
                let response_body = resp.text().await.unwrap_or_default();
                error!(tag = "[OUTGOING API - ERROR]", request_method = %method, request_body = format!("{:?}", body), request_url = %url_str, response_status = status.as_str(), error = %response_body, latency = format!("{:?}ms", start_time.elapsed().as_millis()));
                Err(CallAPIError::ExternalAPICallError {
                    status: status.as_u16(),
                    body: response_body,
                })
            }
        }
        Err(err) => {
            error!(tag = "[OUTGOING API - ERROR]", request_method = %method, request_body = format!("{:?}", body), request_url = %url_str, error = format!("{:?}", err), latency = format!("{:?}ms", start_time.elapsed().as_millis()));
            if err.is_timeout() {
                Err(CallAPIError::RequestTimeout)
            } else {
                Err(CallAPIError::ConnectionError(err.to_string()))
            }
        }
    }
}
