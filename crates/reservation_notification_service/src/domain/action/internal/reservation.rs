/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::web::{Bytes, Data};
use tracing::warn;

use crate::common::{dispatch::adapter::on_create, types::*};
use crate::dispatch_outcome;
use crate::environment::AppState;
use crate::kafka::producers::kafka_stream_dispatch_report;
use crate::tools::{error::AppError, prometheus::DISPATCH_OUTCOMES};

pub async fn reservation_created(
    data: Data<AppState>,
    api_key: Option<&str>,
    recipient_container_id: RecipientContainerId,
    reservation_id: ReservationId,
    body: Bytes,
) -> Result<DispatchReport, AppError> {
    match api_key {
        None => return Err(AppError::MissingApiKey),
        Some(api_key) if api_key != data.event_api_key => return Err(AppError::InvalidApiKey),
        Some(_) => {}
    }

    let event = serde_json::from_slice::<serde_json::Value>(&body)
        .map_err(|err| AppError::MalformedEvent(format!("body is not valid JSON : {err}")))
        .and_then(|document| {
            on_create(RawReservationEvent {
                recipient_container_id: recipient_container_id.to_owned(),
                reservation_id: reservation_id.to_owned(),
                document,
            })
        })
        .map_err(|err| {
            warn!(tag = "[Dispatch - MalformedEvent]", recipient_container_id = %recipient_container_id.0, reservation_id = %reservation_id.0, error = %err.message());
            dispatch_outcome!("MalformedEvent", err.code().as_str());
            err
        })?;

    let report = data.dispatcher.dispatch(event).await?;

    kafka_stream_dispatch_report(&data.producer, &data.dispatch_report_topic, &report).await;

    Ok(report)
}
