mod handlers;

pub use handlers::*;

use crate::service::ValidatorService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 全部 HTTP 路由
pub fn router(service: Arc<ValidatorService>) -> Router {
    let validate_routes = Router::new()
        .route("/api/validate", post(validate))
        .route("/api/validate/batch", post(validate_batch))
        .route("/api/validate/csv", post(validate_csv))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(validate_routes)
}
