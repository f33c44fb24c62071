/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    web::{self, Bytes, Data},
    App, HttpRequest, HttpResponse, HttpServer,
};
use reqwest::Url;
use reservation_notification_service::common::{
    dispatch::{DeliveryClient, FcmDeliveryClient},
    types::*,
};
use serde_json::{json, Value};

const ACCESS_TOKEN: &str = "secret-token";

#[derive(Clone)]
struct StubReply {
    status: StatusCode,
    body: Value,
    delay: Duration,
}

#[derive(Debug, Clone)]
struct ReceivedRequest {
    authorization: Option<String>,
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FcmStub {
    reply: StubReply,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

async fn fcm_send(req: HttpRequest, body: Bytes, stub: Data<FcmStub>) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let received = ReceivedRequest {
        authorization: header(AUTHORIZATION.as_str()),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    stub.received.lock().unwrap().push(received);

    actix_web::rt::time::sleep(stub.reply.delay).await;
    HttpResponse::build(stub.reply.status).json(stub.reply.body.clone())
}

/// Serves `reply` to every request on an ephemeral local port.
fn start_fcm_stub(reply: StubReply) -> (Url, Arc<Mutex<Vec<ReceivedRequest>>>) {
    let stub = FcmStub {
        reply,
        received: Arc::new(Mutex::new(vec![])),
    };
    let received = stub.received.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(stub.clone()))
            .default_service(web::to(fcm_send))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    let url = Url::parse(&format!(
        "http://{addr}/v1/projects/rns-test/messages:send"
    ))
    .unwrap();
    (url, received)
}

fn client(fcm_url: Url, delivery_timeout: Duration) -> FcmDeliveryClient {
    FcmDeliveryClient::new(fcm_url, ACCESS_TOKEN.to_string(), delivery_timeout).unwrap()
}

fn payload() -> NotificationPayload {
    NotificationPayload {
        notification: Notification {
            title: "Nueva Reserva".to_string(),
            body: "Tienes una nueva reserva para el plan plan42".to_string(),
        },
        token: DeliveryToken::new("tok-abc").unwrap(),
    }
}

#[actix_web::test]
async fn message_is_posted_in_the_fcm_wire_shape() {
    let (url, received) = start_fcm_stub(StubReply {
        status: StatusCode::OK,
        body: json!({ "name": "projects/rns-test/messages/0:1234" }),
        delay: Duration::ZERO,
    });

    let outcome = client(url, Duration::from_secs(5)).send(payload()).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Success(MessageId("projects/rns-test/messages/0:1234".to_string()))
    );

    let received = received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );
    assert_eq!(
        received[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(
        received[0].body,
        json!({
            "message": {
                "notification": {
                    "title": "Nueva Reserva",
                    "body": "Tienes una nueva reserva para el plan plan42"
                },
                "token": "tok-abc"
            }
        })
    );
}

#[actix_web::test]
async fn unregistered_token_is_an_invalid_token_failure() {
    let (url, _) = start_fcm_stub(StubReply {
        status: StatusCode::NOT_FOUND,
        body: json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND",
                "details": [{
                    "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                    "errorCode": "UNREGISTERED"
                }]
            }
        }),
        delay: Duration::ZERO,
    });

    let outcome = client(url, Duration::from_secs(5)).send(payload()).await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failure {
            reason: DeliveryFailureReason::InvalidToken,
            ref detail,
        } if detail.contains("UNREGISTERED")
    ));
}

#[actix_web::test]
async fn throttled_backend_is_a_quota_failure() {
    let (url, _) = start_fcm_stub(StubReply {
        status: StatusCode::TOO_MANY_REQUESTS,
        body: json!({ "error": { "code": 429, "status": "RESOURCE_EXHAUSTED" } }),
        delay: Duration::ZERO,
    });

    let outcome = client(url, Duration::from_secs(5)).send(payload()).await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failure {
            reason: DeliveryFailureReason::QuotaExceeded,
            ..
        }
    ));
}

#[actix_web::test]
async fn slow_backend_times_out_as_unavailable() {
    let (url, received) = start_fcm_stub(StubReply {
        status: StatusCode::OK,
        body: json!({ "name": "projects/rns-test/messages/late" }),
        delay: Duration::from_millis(500),
    });

    let outcome = client(url, Duration::from_millis(50)).send(payload()).await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failure {
            reason: DeliveryFailureReason::BackendUnavailable,
            ..
        }
    ));
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn unreachable_backend_is_unavailable() {
    // nothing listens on the discard port
    let url = Url::parse("http://127.0.0.1:9/v1/projects/rns-test/messages:send").unwrap();

    let outcome = client(url, Duration::from_secs(1)).send(payload()).await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failure {
            reason: DeliveryFailureReason::BackendUnavailable,
            ..
        }
    ));
}

#[actix_web::test]
async fn undecodable_success_body_is_unknown() {
    let (url, _) = start_fcm_stub(StubReply {
        status: StatusCode::OK,
        body: json!({ "unexpected": true }),
        delay: Duration::ZERO,
    });

    let outcome = client(url, Duration::from_secs(5)).send(payload()).await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failure {
            reason: DeliveryFailureReason::Unknown,
            ..
        }
    ));
}
