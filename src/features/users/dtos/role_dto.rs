use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/user/{id}/role/up`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleUpdateRequestDto {
    /// `true` grants the super flag, `false` revokes it
    #[serde(rename = "super")]
    pub is_super: bool,
}

/// `updated` is `true` once the requested flag value is in effect,
/// including when it already was.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleUpdateResponseDto {
    pub updated: bool,
}
