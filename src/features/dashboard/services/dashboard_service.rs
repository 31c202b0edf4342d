use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{authorize, Permission};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::repositories::DashboardRepository;
use crate::features::users::models::User;
use crate::features::users::repositories::UserRepository;
use crate::shared::types::PageQuery;

/// Service for user and admin dashboards
pub struct DashboardService {
    reports: Arc<dyn DashboardRepository>,
    users: Arc<dyn UserRepository>,
}

impl DashboardService {
    pub fn new(reports: Arc<dyn DashboardRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { reports, users }
    }

    /// Profile figures for `user_id`.
    ///
    /// An admin looking at their own profile gets site-wide counts; everyone
    /// else (including an admin looking at someone else) gets that user's figures.
    pub async fn profile(&self, actor: &AuthenticatedUser, user_id: i64) -> Result<ProfileDto> {
        authorize(actor, Permission::ViewDashboard { owner_id: user_id })?;
        let user = self.find_user(user_id).await?;

        let stats = if actor.is_admin() && actor.owns(user.id) {
            DashboardStatsDto::Site(self.reports.site_stats().await?)
        } else {
            DashboardStatsDto::User(self.reports.user_stats(user.id).await?)
        };

        Ok(ProfileDto {
            user: user.into(),
            stats,
        })
    }

    pub async fn list_orders(
        &self,
        actor: &AuthenticatedUser,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<OrderListItemDto>, i64)> {
        authorize(actor, Permission::ViewDashboard { owner_id: user_id })?;
        let user = self.find_user(user_id).await?;

        self.reports.list_user_orders(user.id, page).await
    }

    pub async fn list_products(
        &self,
        actor: &AuthenticatedUser,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        authorize(actor, Permission::ViewDashboard { owner_id: user_id })?;
        let user = self.find_user(user_id).await?;

        self.reports.list_user_products(user.id, page).await
    }

    /// Every user with their product and order counts (admin only).
    ///
    /// `user_id` is the dashboard the listing is shown on; it must exist, but
    /// the listing itself is global.
    pub async fn list_users(
        &self,
        actor: &AuthenticatedUser,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<UserListItemDto>, i64)> {
        authorize(actor, Permission::ListAllUsers)?;
        self.find_user(user_id).await?;

        self.reports.list_users(page).await
    }

    async fn find_user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }
}
