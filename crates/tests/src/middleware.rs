/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    web::{self, Data},
    App, HttpResponse,
};
use reservation_notification_service::{
    domain::api,
    environment::AppState,
    middleware::{CheckContentLength, RequestTimeout},
};
use serde_json::json;

use crate::fakes::*;
use crate::reservation_api::{app_state, sup1_directory, API_KEY, CREATED_URI};

/// Status of the response, whether the service answered or a middleware failed the request.
async fn status_of<S, R, B>(app: &S, req: R) -> StatusCode
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match app.call(req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    }
}

async fn slow_handler() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_millis(500)).await;
    HttpResponse::Ok().finish()
}

async fn fast_handler() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_web::test]
async fn oversized_event_is_rejected_before_dispatch() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("projects/p/messages/1"));
    let state = AppState {
        max_allowed_req_size: 64,
        ..app_state(&directory, &delivery)
    };
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state))
            .wrap(CheckContentLength)
            .configure(api::handler),
    )
    .await;

    let body = json!({
        "supplier": "sup1",
        "planID": "plan42",
        "client": "client1",
        "notes": "x".repeat(128)
    })
    .to_string();
    let req = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .insert_header(("content-type", "application/json"))
        .set_payload(body.clone())
        .insert_header(("content-length", body.len().to_string()))
        .to_request();

    assert_eq!(status_of(&app, req).await, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(directory.lookups(), 0);
    assert!(delivery.sent().is_empty());
}

#[actix_web::test]
async fn event_within_the_size_limit_is_dispatched() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("projects/p/messages/1"));
    let state = AppState {
        max_allowed_req_size: 4_096,
        ..app_state(&directory, &delivery)
    };
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state))
            .wrap(CheckContentLength)
            .configure(api::handler),
    )
    .await;

    let body = json!({ "supplier": "sup1", "planID": "plan42" }).to_string();
    let req = test::TestRequest::post()
        .uri(CREATED_URI)
        .insert_header(("x-api-key", API_KEY))
        .insert_header(("content-type", "application/json"))
        .set_payload(body.clone())
        .insert_header(("content-length", body.len().to_string()))
        .to_request();

    assert_eq!(status_of(&app, req).await, StatusCode::OK);
    assert_eq!(delivery.sent().len(), 1);
}

#[actix_web::test]
async fn slow_request_times_out() {
    let directory = sup1_directory();
    let delivery = Arc::new(FakeDeliveryClient::delivering("projects/p/messages/1"));
    let state = AppState {
        request_timeout: 50,
        ..app_state(&directory, &delivery)
    };
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state))
            .wrap(RequestTimeout)
            .route("/slow", web::get().to(slow_handler))
            .route("/fast", web::get().to(fast_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/slow").to_request();
    assert_eq!(status_of(&app, req).await, StatusCode::REQUEST_TIMEOUT);

    let req = test::TestRequest::get().uri("/fast").to_request();
    assert_eq!(status_of(&app, req).await, StatusCode::OK);
}
