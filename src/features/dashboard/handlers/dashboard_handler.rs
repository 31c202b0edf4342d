use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::{ApiResponse, Meta, PageQuery};

// ============================================================================
// Profile
// ============================================================================

/// Dashboard figures for a user
#[utoipa::path(
    get,
    path = "/user/{id}/profile",
    tag = "dashboard",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Per-user or site-wide figures", body = ApiResponse<ProfileDto>),
        (status = 302, description = "Not logged in, redirected to login"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<ProfileDto>>> {
    let profile = service.profile(&user, user_id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

// ============================================================================
// Listings
// ============================================================================

/// A user's orders, newest first, 40 per page
#[utoipa::path(
    get,
    path = "/user/{id}/orders",
    tag = "dashboard",
    params(
        ("id" = i64, Path, description = "User ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Orders with their product", body = ApiResponse<Vec<OrderListItemDto>>),
        (status = 302, description = "Not logged in, redirected to login"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_orders(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
    Path(user_id): Path<i64>,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<OrderListItemDto>>>> {
    let (items, total) = service.list_orders(&user, user_id, &page).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paginated(total, &page)),
    )))
}

/// A user's products, newest first, 40 per page
#[utoipa::path(
    get,
    path = "/user/{id}/products",
    tag = "dashboard",
    params(
        ("id" = i64, Path, description = "User ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Products with order aggregates", body = ApiResponse<Vec<ProductListItemDto>>),
        (status = 302, description = "Not logged in, redirected to login"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_products(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
    Path(user_id): Path<i64>,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<ProductListItemDto>>>> {
    let (items, total) = service.list_products(&user, user_id, &page).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paginated(total, &page)),
    )))
}

/// All users (admin only)
#[utoipa::path(
    get,
    path = "/user/{id}/users",
    tag = "dashboard",
    params(
        ("id" = i64, Path, description = "User whose dashboard shows the listing"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Users with product and order counts", body = ApiResponse<Vec<UserListItemDto>>),
        (status = 302, description = "Not logged in, redirected to login"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
    Path(user_id): Path<i64>,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<UserListItemDto>>>> {
    tracing::debug!(
        admin_id = admin.id,
        dashboard_owner = user_id,
        page = page.page(),
        "Listing users"
    );

    let (items, total) = service.list_users(&admin, user_id, &page).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paginated(total, &page)),
    )))
}
