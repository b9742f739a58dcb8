use axum::{routing::get, Router};

pub mod reports;
pub mod sales;
pub mod stock;
pub mod system;

/// Router for all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/stock", stock::router())
        .nest("/sales", sales::router().merge(reports::router()))
}
