use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};

use crate::core::config::{AppConfig, AuthConfig};
use crate::core::middleware::{self, SessionGate};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::auth::{Authenticator, JwtValidator};
use crate::features::categories::{self, CategoryRepository, CategoryService};
use crate::features::dashboard::{self, DashboardRepository, DashboardService};
use crate::features::users::routes as users_routes;
use crate::features::users::{RoleService, UserRepository};

/// Everything the router needs, wired over the repository implementations
pub struct AppServices {
    pub authenticator: Arc<Authenticator>,
    pub auth: Arc<AuthService>,
    pub dashboard: Arc<DashboardService>,
    pub roles: Arc<RoleService>,
    pub categories: Arc<CategoryService>,
}

impl AppServices {
    pub fn new(
        auth_config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        reports: Arc<dyn DashboardRepository>,
        catalog: Arc<dyn CategoryRepository>,
    ) -> Self {
        let validator = Arc::new(JwtValidator::new(auth_config));

        Self {
            authenticator: Arc::new(Authenticator::new(
                Arc::clone(&validator),
                Arc::clone(&users),
            )),
            auth: Arc::new(AuthService::new(
                Arc::clone(&users),
                validator,
                auth_config.secure_cookie,
            )),
            dashboard: Arc::new(DashboardService::new(reports, Arc::clone(&users))),
            roles: Arc::new(RoleService::new(users)),
            categories: Arc::new(CategoryService::new(catalog)),
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Application routes without the outer HTTP layers (CORS, tracing, request id, swagger).
///
/// Dashboard pages redirect anonymous visitors to the login page; API routes answer 401.
pub fn build_router(services: AppServices, config: &AppConfig) -> Router {
    let gate = SessionGate {
        authenticator: Arc::clone(&services.authenticator),
        login_url: Arc::from(config.login_url.as_str()),
    };

    // Session-authenticated dashboard pages
    let page_routes = dashboard::routes(services.dashboard)
        .route_layer(from_fn_with_state(gate, middleware::session_middleware));

    // Bearer/cookie-authenticated API
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(users_routes::routes(services.roles))
        .route_layer(from_fn_with_state(
            services.authenticator,
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(services.auth))
        .merge(categories::routes(services.categories))
        .route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(protected_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
}
