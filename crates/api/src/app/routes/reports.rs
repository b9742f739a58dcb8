use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/items-sold", get(items_sold))
}

/// Per-item sale counts. Alerting on popular items rides on this read; a
/// failed alert fails the whole request.
pub async fn items_sold(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.items_sold().await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) => errors::items_sold_error_to_response(e),
    }
}
