/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use std::{rc::Rc, time::Duration};

use crate::incoming_api;
use crate::tools::prometheus::INCOMING_API;
use actix::fut::{ready, Ready};
use actix_http::{
    h1,
    header::{AUTHORIZATION, CONTENT_LENGTH},
    StatusCode,
};
use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{self, forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web::{self, Bytes, Data},
    Error, HttpRequest,
};
use futures::future::LocalBoxFuture;
use tokio::time::{timeout, Instant};
use tracing::Span;
use tracing::{error, info, warn};
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};
use uuid::Uuid;

use crate::{environment::AppState, tools::error::AppError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Fails the request with `RequestTimeout` once `request_timeout` milliseconds of the
/// application data have elapsed.
pub struct RequestTimeout;

impl<S: 'static> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware { service }))
    }
}

pub struct RequestTimeoutMiddleware<S> {
    service: S,
}

impl<S> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_timeout = req
            .app_data::<Data<AppState>>()
            .map(|data| Duration::from_millis(data.request_timeout));
        let fut = self.service.call(req);
        match request_timeout {
            Some(timeout_duration) => Box::pin(async move {
                timeout(timeout_duration, fut)
                    .await
                    .map_err(|_| actix_web::Error::from(AppError::RequestTimeout))?
            }),
            None => Box::pin(fut),
        }
    }
}

/// Root span of every request, carrying the caller's `x-request-id` (or a fresh one) and the
/// event source's `x-event-id` when present.
pub struct DomainRootSpanBuilder;

impl RootSpanBuilder for DomainRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|request_id| request_id.to_str().ok())
            .map(|str| str.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let event_id = request
            .headers()
            .get("x-event-id")
            .and_then(|event_id| event_id.to_str().ok())
            .map(|str| str.to_string());

        tracing_actix_web::root_span!(request, request_id, event_id)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Logs every request with its latency and records it into the incoming API histogram,
/// labelled with the error code of failed requests.
pub struct IncomingRequestMetrics;

impl<S> Transform<S, ServiceRequest> for IncomingRequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = IncomingRequestMetricsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IncomingRequestMetricsMiddleware { service }))
    }
}

pub struct IncomingRequestMetricsMiddleware<S> {
    service: S,
}

impl<S> Service<ServiceRequest> for IncomingRequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let request_info = RequestInfo::from(req.request());

        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(response) => {
                    calculate_metrics(
                        response.response().error(),
                        response.status(),
                        RequestInfo::from(response.request()),
                        start_time,
                    );
                    Ok(response)
                }
                Err(err) => {
                    let err_resp_status = err.error_response().status();
                    calculate_metrics(Some(&err), err_resp_status, request_info, start_time);
                    Err(err)
                }
            }
        })
    }
}

/// Logs the raw body of requests that failed with one of the error codes listed in
/// `log_unprocessible_req_body`.
pub struct LogIncomingRequestBody;

impl<S: 'static> Transform<S, ServiceRequest> for LogIncomingRequestBody
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = LogIncomingRequestBodyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LogIncomingRequestBodyMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct LogIncomingRequestBodyMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for LogIncomingRequestBodyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        Box::pin(async move {
            let log_unprocessible_req_body = req
                .app_data::<Data<AppState>>()
                .map_or(vec![], |data| data.log_unprocessible_req_body.to_owned());

            if log_unprocessible_req_body.is_empty() {
                return svc.call(req).await;
            }

            let body = req.extract::<web::Bytes>().await?;
            req.set_payload(bytes_to_payload(body.clone()));

            let result = svc.call(req).await;
            match &result {
                Ok(response) => {
                    if let Some(err_resp) = response.response().error() {
                        log_request_body(&log_unprocessible_req_body, err_resp, &body);
                    }
                }
                Err(err_resp) => log_request_body(&log_unprocessible_req_body, err_resp, &body),
            }
            result
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> dev::Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    dev::Payload::from(pl)
}

struct RequestInfo {
    method: String,
    path: String,
    headers: String,
}

impl From<&HttpRequest> for RequestInfo {
    fn from(request: &HttpRequest) -> Self {
        RequestInfo {
            method: request.method().to_string(),
            path: get_path(request),
            headers: get_headers(request),
        }
    }
}

/// Request path with every matched segment replaced by its placeholder, so that metrics are
/// labelled per route rather than per reservation.
fn get_path(request: &HttpRequest) -> String {
    let mut path = request.path().to_string();
    request
        .match_info()
        .iter()
        .for_each(|(path_name, path_val)| {
            path = path.replace(path_val, format!(":{path_name}").as_str());
        });
    path
}

// credentials are never logged
fn get_headers(request: &HttpRequest) -> String {
    let headers: Vec<String> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            if *name == AUTHORIZATION || name.as_str() == API_KEY_HEADER {
                format!("{name}: <redacted>")
            } else {
                format!("{name}: {value:?}")
            }
        })
        .collect();
    headers.join(", ")
}

fn calculate_metrics(
    err_resp: Option<&Error>,
    resp_status: StatusCode,
    request_info: RequestInfo,
    time: Instant,
) {
    let RequestInfo {
        method,
        path,
        headers,
    } = request_info;

    if let Some(err_resp) = err_resp {
        let err_resp_code = err_resp.to_string();
        error!(tag = "[INCOMING API - ERROR]", request_method = %method, request_path = %path, request_headers = headers, response_code = err_resp_code, response_status = resp_status.as_str(), latency = format!("{:?}ms", time.elapsed().as_millis()));
        incoming_api!(
            method.as_str(),
            path.as_str(),
            resp_status.as_str(),
            err_resp_code.as_str(),
            time
        );
    } else {
        info!(tag = "[INCOMING API]", request_method = %method, request_path = %path, request_headers = headers, response_status = resp_status.as_str(), latency = format!("{:?}ms", time.elapsed().as_millis()));
        incoming_api!(
            method.as_str(),
            path.as_str(),
            resp_status.as_str(),
            "SUCCESS",
            time
        );
    }
}

fn log_request_body(err_codes: &[String], err_resp: &Error, request_body: &Bytes) {
    let err_code = err_resp.to_string();
    if err_codes.contains(&err_code) {
        warn!(tag = "[INCOMING API - UNPROCESSIBLE BODY]", response_code = %err_code, "Raw Request Body: {:?}", request_body);
    }
}

/// Rejects requests whose declared `content-length` exceeds `max_allowed_req_size` before
/// they reach any handler.
pub struct CheckContentLength;

impl<S> Transform<S, ServiceRequest> for CheckContentLength
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CheckContentLengthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CheckContentLengthMiddleware { service }))
    }
}

pub struct CheckContentLengthMiddleware<S> {
    service: S,
}

impl<S> Service<ServiceRequest> for CheckContentLengthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let content_length = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|content_length| content_length.to_str().ok()?.parse::<usize>().ok());
        let limit = req
            .app_data::<Data<AppState>>()
            .map(|data| data.max_allowed_req_size);

        if let (Some(content_length), Some(limit)) = (content_length, limit) {
            if content_length > limit {
                return Box::pin(ready(Err(actix_web::Error::from(
                    AppError::LargePayloadSize(content_length, limit),
                ))));
            }
        }

        Box::pin(self.service.call(req))
    }
}
