use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{RoleUpdateRequestDto, RoleUpdateResponseDto};
use crate::features::users::services::RoleService;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// Grant or revoke the super flag on a user
#[utoipa::path(
    post,
    path = "/api/user/{id}/role/up",
    params(
        ("id" = i64, Path, description = "Target user ID")
    ),
    request_body = RoleUpdateRequestDto,
    responses(
        (status = 200, description = "Flag value in effect", body = RoleUpdateResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Target is an admin")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn role_up(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<RoleService>>,
    Path(user_id): Path<i64>,
    AppJson(dto): AppJson<RoleUpdateRequestDto>,
) -> Result<Json<RoleUpdateResponseDto>> {
    service.set_super(&admin, user_id, dto.is_super).await?;
    Ok(Json(RoleUpdateResponseDto { updated: true }))
}
