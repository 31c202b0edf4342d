use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{authorize, Permission};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::UserRole;
use crate::features::users::repositories::UserRepository;

/// Grants and revokes the super flag
pub struct RoleService {
    users: Arc<dyn UserRepository>,
}

impl RoleService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Set or clear the super flag on `target_id`.
    ///
    /// Only admins may call this, and admin accounts (the caller included)
    /// cannot be targeted. Returns whether a write happened; repeating the same
    /// request is a no-op.
    pub async fn set_super(
        &self,
        actor: &AuthenticatedUser,
        target_id: i64,
        is_super: bool,
    ) -> Result<bool> {
        authorize(actor, Permission::ElevateRole)?;

        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", target_id)))?;

        if target.role.is_admin() {
            return Err(AppError::Conflict(
                "Admin accounts cannot be promoted or demoted".to_string(),
            ));
        }

        let role = UserRole::from_super_flag(is_super);
        let changed = self.users.set_role(target.id, role).await?;

        if changed {
            tracing::info!(
                actor_id = actor.id,
                target_id = target.id,
                from = %target.role,
                to = %role,
                "User role changed"
            );
        } else {
            tracing::debug!(target_id = target.id, role = %role, "Role already set");
        }

        Ok(changed)
    }
}
