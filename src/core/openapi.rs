use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Dashboard (session)
        dashboard_handlers::get_profile,
        dashboard_handlers::list_orders,
        dashboard_handlers::list_products,
        dashboard_handlers::list_users,
        // Users (admin)
        users_handlers::role_up,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::list_category_products,
    ),
    components(
        schemas(
            // Shared
            Meta,
            users_models::UserRole,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::model::AuthenticatedUser>,
            // Dashboard
            dashboard_dtos::UserStatsDto,
            dashboard_dtos::SiteStatsDto,
            dashboard_dtos::DashboardStatsDto,
            dashboard_dtos::UserSummaryDto,
            dashboard_dtos::ProfileDto,
            dashboard_dtos::OrderProductDto,
            dashboard_dtos::OrderListItemDto,
            dashboard_dtos::ProductListItemDto,
            dashboard_dtos::UserListItemDto,
            ApiResponse<dashboard_dtos::ProfileDto>,
            ApiResponse<Vec<dashboard_dtos::OrderListItemDto>>,
            ApiResponse<Vec<dashboard_dtos::ProductListItemDto>>,
            ApiResponse<Vec<dashboard_dtos::UserListItemDto>>,
            // Users
            users_dtos::RoleUpdateRequestDto,
            users_dtos::RoleUpdateResponseDto,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryProductDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryProductDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Login, logout and the current session"),
        (name = "dashboard", description = "Per-user and admin dashboards (session required)"),
        (name = "users", description = "Role elevation (admin only)"),
        (name = "categories", description = "Catalog categories and their products (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Lapak API",
        version = "0.1.0",
        description = "API documentation for the Lapak marketplace dashboard",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
