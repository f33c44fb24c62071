/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    post,
    web::{Bytes, Data, Json, Path},
    HttpRequest,
};

use crate::{
    common::types::*,
    domain::action::internal::*,
    environment::AppState,
    middleware::API_KEY_HEADER,
    tools::error::AppError,
};

#[post("/internal/reservations/{recipientContainerId}/{reservationId}/created")]
async fn reservation_created(
    data: Data<AppState>,
    req: HttpRequest,
    path: Path<(String, String)>,
    body: Bytes,
) -> Result<Json<DispatchReport>, AppError> {
    let (recipient_container_id, reservation_id) = path.into_inner();
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|api_key| api_key.to_str().ok());

    Ok(Json(
        reservation::reservation_created(
            data,
            api_key,
            RecipientContainerId(recipient_container_id),
            ReservationId(reservation_id),
            body,
        )
        .await?,
    ))
}
