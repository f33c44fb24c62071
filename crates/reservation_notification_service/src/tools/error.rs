/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
    pub error_code: String,
}

#[macros::add_error]
pub enum AppError {
    InternalError(String),
    MalformedEvent(String),
    RecipientNotFound(String),
    TokenDirectoryUnavailable(String),
    RedisConnectionError(String),
    SerializationError(String),
    DeserializationError(String),
    LargePayloadSize(usize, usize),
    RequestTimeout,
    InvalidApiKey,
    MissingApiKey,
}

impl AppError {
    fn error_message(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.message(),
            error_code: self.code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(err) => err.to_string(),
            AppError::MalformedEvent(reason) => format!("Malformed reservation event : {reason}"),
            AppError::RecipientNotFound(recipient_id) => {
                format!("Recipient not found : {recipient_id}")
            }
            AppError::TokenDirectoryUnavailable(err) => {
                format!("Token directory unavailable : {err}")
            }
            AppError::RedisConnectionError(err) => format!("Redis Connection Error : {err}"),
            AppError::SerializationError(err) => err.to_string(),
            AppError::DeserializationError(err) => err.to_string(),
            AppError::LargePayloadSize(length, limit) => {
                format!("Content length ({length} Bytes) greater than allowed maximum limit : ({limit} Bytes)")
            }
            AppError::RequestTimeout => "Request timed out".to_string(),
            AppError::InvalidApiKey => "Invalid api key".to_string(),
            AppError::MissingApiKey => "Missing api key".to_string(),
        }
    }

    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(self.error_message())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            AppError::RecipientNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TokenDirectoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RedisConnectionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DeserializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LargePayloadSize(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::MissingApiKey => StatusCode::BAD_REQUEST,
        }
    }
}
