//! Explicit permission checks.
//!
//! Every dashboard, listing and role operation calls [`authorize`] before it
//! touches the store:
//!
//! | Permission | Allowed for |
//! |------------|-------------|
//! | `ViewDashboard { owner_id }` | the owner, or any `admin` |
//! | `ListAllUsers` | `admin` only |
//! | `ElevateRole` | `admin` only |
//!
//! The `super` role grants nothing here; it is a flag admins hand out, not an
//! administrative privilege.

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewDashboard { owner_id: i64 },
    ListAllUsers,
    ElevateRole,
}

pub fn authorize(actor: &AuthenticatedUser, permission: Permission) -> Result<()> {
    let allowed = match (actor.role, permission) {
        (UserRole::Admin, _) => true,
        (UserRole::User | UserRole::Super, Permission::ViewDashboard { owner_id }) => {
            actor.owns(owner_id)
        }
        (UserRole::User | UserRole::Super, Permission::ListAllUsers | Permission::ElevateRole) => {
            false
        }
    };

    if allowed {
        Ok(())
    } else {
        tracing::warn!(
            actor_id = actor.id,
            role = %actor.role,
            ?permission,
            "Permission denied"
        );
        Err(AppError::Forbidden(denial_message(permission).to_string()))
    }
}

fn denial_message(permission: Permission) -> &'static str {
    match permission {
        Permission::ViewDashboard { .. } => "You can only access your own dashboard",
        Permission::ListAllUsers => "Admin access required to list users",
        Permission::ElevateRole => "Admin access required to change roles",
    }
}
