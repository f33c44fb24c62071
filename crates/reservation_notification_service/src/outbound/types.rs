/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use serde::{Deserialize, Serialize};

use crate::common::types::*;

// FCM HTTP v1 send request
#[derive(Serialize, Debug)]
pub struct FcmSendReq {
    pub message: NotificationPayload,
}

// FCM HTTP v1 send response, `name` is the message id
#[derive(Deserialize, Debug)]
pub struct FcmSendResp {
    pub name: String,
}

// FCM error response
#[derive(Deserialize, Debug)]
pub struct FcmErrorResp {
    pub error: FcmError,
}

#[derive(Deserialize, Debug)]
pub struct FcmError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<FcmErrorDetail>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FcmErrorDetail {
    #[serde(rename = "@type")]
    pub type_url: Option<String>,
    pub error_code: Option<String>,
}
