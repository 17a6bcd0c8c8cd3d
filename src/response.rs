/// Response Envelope
///
/// Every JSON response shares one shape:
/// `{"status": "SUCCESS" | "ERROR", "message": "...", <paging>, "data": ...}`.

use actix_web::HttpResponse;
use serde::Serialize;

pub const BAD_REQUEST_MSG: &str =
    "Invalid request body, Please check your request body and try again!";
pub const NOT_FOUND_MSG: &str =
    "The requested resource could not be found but may be available in the future.";
pub const CONFLICT_MSG: &str = "The request could not be completed due to a conflict with the current state of the target resource.";
pub const UNAUTHORIZED_MSG: &str =
    "Authentication is required and has failed or has not yet been provided.";
pub const INTERNAL_SERVER_ERROR_MSG: &str =
    "The server encountered an unexpected condition which prevented it from fulfilling the request.";

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Error,
}

/// Paging metadata; zero-valued fields are left out of the body.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_record: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_record: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_page: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: Status,
    pub message: String,
    #[serde(flatten)]
    pub paging: Option<Paging>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            message: String::new(),
            paging: None,
            data: Some(data),
        }
    }

    pub fn with_paging(data: T, paging: Paging) -> Self {
        Self {
            status: Status::Success,
            message: String::new(),
            paging: Some(paging),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn empty() -> Self {
        Self {
            status: Status::Success,
            message: String::new(),
            paging: None,
            data: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            message: message.to_string(),
            paging: None,
            data: None,
        }
    }
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data))
}

/// 200 without a body payload.
pub fn ok_empty() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::empty())
}

pub fn ok_with_paging<T: Serialize>(data: T, paging: Paging) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::with_paging(data, paging))
}
