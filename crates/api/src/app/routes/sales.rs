use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(record_sale).get(list_sales))
        .route("/stats", get(sales_stats))
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RecordSaleRequest>,
) -> axum::response::Response {
    let receipt = match services.record_sale(body.into_draft()).await {
        Ok(r) => r,
        Err(e) => return errors::record_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "detail": receipt.confirmation(),
            "id": receipt.sale.id.to_string(),
            "remaining_stock": receipt.remaining_stock,
        })),
    )
        .into_response()
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.sales().await {
        Ok(sales) => {
            let items = sales.iter().map(dto::sale_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn sales_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.sales_stats().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
