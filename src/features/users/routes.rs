use crate::features::users::handlers;
use crate::features::users::services::RoleService;
use axum::{routing::post, Router};
use std::sync::Arc;

pub fn routes(service: Arc<RoleService>) -> Router {
    Router::new()
        .route("/api/user/{id}/role/up", post(handlers::role_up))
        .with_state(service)
}
