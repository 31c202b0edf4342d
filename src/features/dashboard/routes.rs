use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Dashboard page routes (session required)
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/user/{id}/profile", get(handlers::get_profile))
        .route("/user/{id}/orders", get(handlers::list_orders))
        .route("/user/{id}/products", get(handlers::list_products))
        .route("/user/{id}/users", get(handlers::list_users))
        .with_state(dashboard_service)
}
