/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;

pub const NOTIFICATION_TITLE: &str = "Nueva Reserva";

pub fn compose(event: &ReservationEvent, token: DeliveryToken) -> NotificationPayload {
    let PlanId(plan_id) = &event.plan_id;
    NotificationPayload {
        notification: Notification {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Tienes una nueva reserva para el plan {plan_id}"),
        },
        token,
    }
}
