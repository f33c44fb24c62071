/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web::Data, App};
use reservation_notification_service::{domain::api, environment::AppState};
use serde_json::{json, Value};

use crate::fakes::*;

pub(crate) const API_KEY: &str = "test-api-key";
pub(crate) const CREATED_URI: &str = "/internal/reservations/client1/res1/created";

pub(crate) fn app_state(
    directory: &Arc<FakeTokenDirectory>,
    delivery: &Arc<FakeDeliveryClient>,
) -> AppState {
    AppState {
        dispatcher: Arc::new(dispatcher(directory, delivery)),
        producer: None,
        dispatch_report_topic: "reservation-dispatch-report".to_string(),
        event_api_key: API_KEY.to_string(),
        max_allowed_req_size: 512_000,
        log_unprocessible_req_body: vec![],
        request_timeout: 9_000,
    }
}

pub(crate) fn sup1_directory() -> Arc<FakeTokenDirectory> {
    Arc::new(
        FakeTokenDirectory::default()
            .with_recipient("sup1", StoredRecipient::WithToken("tok-abc".to_string())),
    )
}

#[actix_web::test]
async fn created_reservation_is_dispatched_and_reported() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("projects/p/messages/1"));
    let app = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&directory, &delivery)))
            .configure(api::handler),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .set_json(json!({ "supplier": "sup1", "planID": "plan42", "client": "client1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["reservationId"], "res1");
    assert_eq!(body["recipientId"], "sup1");
    assert_eq!(body["planId"], "plan42");
    assert_eq!(
        body["outcome"],
        json!({ "state": "Delivered", "messageId": "projects/p/messages/1" })
    );
    assert!(body["dispatchedAt"].is_string());
    assert_eq!(delivery.sent().len(), 1);
}

#[actix_web::test]
async fn unknown_supplier_is_a_successful_no_token_dispatch() {
    let directory = Arc::new(FakeTokenDirectory::default());
    let delivery = Arc::new(FakeDeliveryClient::delivering("unused"));
    let app = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&directory, &delivery)))
            .configure(api::handler),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/internal/reservations/client1/res2/created")
        .insert_header(("x-api-key", API_KEY))
        .set_json(json!({ "supplier": "sup2", "planID": "plan7" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["outcome"],
        json!({ "state": "NoToken", "reason": "RECIPIENT_NOT_FOUND" })
    );
    assert!(delivery.sent().is_empty());
}

#[actix_web::test]
async fn requests_without_the_api_key_are_rejected() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("unused"));
    let app = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&directory, &delivery)))
            .configure(api::handler),
    )
    .await;

    let missing = test::TestRequest::post()
        .uri(CREATED_URI)
        .set_json(json!({ "supplier": "sup1", "planID": "plan42" }))
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "MISSING_API_KEY");

    let wrong = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", "not-the-key"))
        .set_json(json!({ "supplier": "sup1", "planID": "plan42" }))
        .to_request();
    let resp = test::call_service(&app, wrong).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "INVALID_API_KEY");

    assert_eq!(directory.lookups(), 0);
    assert!(delivery.sent().is_empty());
}

#[actix_web::test]
async fn malformed_events_never_reach_the_directory() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("unused"));
    let app = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&directory, &delivery)))
            .configure(api::handler),
    )
    .await;

    let missing_plan = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .set_json(json!({ "supplier": "sup1" }))
        .to_request();
    let resp = test::call_service(&app, missing_plan).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "MALFORMED_EVENT");

    let not_json = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .set_payload("supplier=sup1&planID=plan42")
        .to_request();
    let resp = test::call_service(&app, not_json).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(directory.lookups(), 0);
    assert!(delivery.sent().is_empty());
}

#[actix_web::test]
async fn directory_outage_is_reported_as_unavailable() {
    let directory = Arc::new(FakeTokenDirectory::unavailable());
    let delivery = Arc::new(FakeDeliveryClient::delivering("unused"));
    let app = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&directory, &delivery)))
            .configure(api::handler),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .set_json(json!({ "supplier": "sup1", "planID": "plan42" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "TOKEN_DIRECTORY_UNAVAILABLE");
    assert!(delivery.sent().is_empty());
}

#[actix_web::test]
async fn healthcheck_follows_the_token_directory() {
    let delivery = Arc::new(FakeDeliveryClient::delivering("unused"));

    let healthy = test::init_service(
        App::new()
            .app_data(Data::new(app_state(&sup1_directory(), &delivery)))
            .configure(api::handler),
    )
    .await;
    let resp =
        test::call_service(&healthy, test::TestRequest::get().uri("/healthcheck").to_request())
            .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "result": "Service Is Up" }));

    let unhealthy = test::init_service(
        App::new()
            .app_data(Data::new(app_state(
                &Arc::new(FakeTokenDirectory::unavailable()),
                &delivery,
            )))
            .configure(api::handler),
    )
    .await;
    let resp = test::call_service(
        &unhealthy,
        test::TestRequest::get().uri("/healthcheck").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
