/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use serde_json::{Number, Value};

use crate::common::types::*;
use crate::tools::error::AppError;

const SUPPLIER_FIELD: &str = "supplier";
const PLAN_FIELD: &str = "planID";

// 2^53, integers up to this magnitude are exact in f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Turns one raw creation event into a [`ReservationEvent`].
///
/// The recipient is the `supplier` of the created document and the plan is its `planID`,
/// which may be stored either as a string or as a number.
pub fn on_create(raw_event: RawReservationEvent) -> Result<ReservationEvent, AppError> {
    let RawReservationEvent {
        reservation_id,
        document,
        ..
    } = raw_event;

    if reservation_id.0.trim().is_empty() {
        return Err(AppError::MalformedEvent(
            "reservationId is empty".to_string(),
        ));
    }

    let document = document.as_object().ok_or_else(|| {
        AppError::MalformedEvent("reservation document is not a JSON object".to_string())
    })?;

    let recipient_id = match document.get(SUPPLIER_FIELD) {
        Some(Value::String(supplier)) if !supplier.trim().is_empty() => {
            RecipientId(supplier.trim().to_string())
        }
        Some(Value::String(_)) => {
            return Err(AppError::MalformedEvent(format!(
                "{SUPPLIER_FIELD} is empty"
            )))
        }
        Some(Value::Null) | None => {
            return Err(AppError::MalformedEvent(format!(
                "{SUPPLIER_FIELD} is missing"
            )))
        }
        Some(_) => {
            return Err(AppError::MalformedEvent(format!(
                "{SUPPLIER_FIELD} is not a string"
            )))
        }
    };

    let plan_id = match document.get(PLAN_FIELD) {
        Some(Value::String(plan)) if !plan.trim().is_empty() => PlanId(plan.to_string()),
        Some(Value::String(_)) => {
            return Err(AppError::MalformedEvent(format!("{PLAN_FIELD} is empty")))
        }
        Some(Value::Number(plan)) => PlanId(render_plan_number(plan)),
        Some(Value::Null) | None => {
            return Err(AppError::MalformedEvent(format!("{PLAN_FIELD} is missing")))
        }
        Some(_) => {
            return Err(AppError::MalformedEvent(format!(
                "{PLAN_FIELD} is neither a string nor a number"
            )))
        }
    };

    Ok(ReservationEvent {
        reservation_id,
        recipient_id,
        plan_id,
    })
}

/// Integral values are written without a fractional part (`42.0` becomes `42`), the way a
/// document double is rendered when interpolated into text.
fn render_plan_number(plan: &Number) -> String {
    if plan.is_i64() || plan.is_u64() {
        return plan.to_string();
    }
    match plan.as_f64() {
        Some(plan) if plan.fract() == 0.0 && plan.abs() <= MAX_SAFE_INTEGER => {
            format!("{}", plan as i64)
        }
        _ => plan.to_string(),
    }
}
