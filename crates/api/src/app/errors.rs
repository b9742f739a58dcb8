use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopledger_infra::{RecordError, StoreError};

use crate::app::services::ItemsSoldError;

pub fn record_error_to_response(err: RecordError) -> axum::response::Response {
    match err {
        RecordError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        RecordError::UnknownItem(name) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no stock item named {name:?}"),
        ),
        RecordError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "conflict", "Not enough stock available.")
        }
        RecordError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::UnknownItem(name) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no stock item named {name:?}"),
        ),
        StoreError::DuplicateItem(name) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("stock item {name:?} already exists"),
        ),
        StoreError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "conflict", "Not enough stock available.")
        }
        other => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string()),
    }
}

pub fn items_sold_error_to_response(err: ItemsSoldError) -> axum::response::Response {
    match err {
        ItemsSoldError::Store(e) => store_error_to_response(e),
        // The alert mail is part of the operation; a transport failure is the
        // upstream's, not ours.
        ItemsSoldError::Mail(e) => json_error(StatusCode::BAD_GATEWAY, "mail_error", e.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
