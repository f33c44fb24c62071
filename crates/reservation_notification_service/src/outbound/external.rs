/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use crate::common::types::*;
use crate::tools::callapi::{call_api, CallAPIError};
use reqwest::{Client, Method, Url};

pub async fn send_fcm_message(
    client: &Client,
    fcm_url: &Url,
    access_token: &str,
    payload: NotificationPayload,
) -> Result<FcmSendResp, CallAPIError> {
    let authorization = format!("Bearer {access_token}");
    call_api::<FcmSendResp, FcmSendReq>(
        client,
        Method::POST,
        fcm_url,
        vec![
            ("content-type", "application/json"),
            ("authorization", authorization.as_str()),
        ],
        Some(FcmSendReq { message: payload }),
    )
    .await
}
