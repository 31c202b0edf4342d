use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::users::models::{User, UserRole};

// ============================================================================
// Aggregates
// ============================================================================

/// Figures scoped to a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserStatsDto {
    pub orders_count: i64,
    pub sent_orders_count: i64,
    pub products_count: i64,
    /// Sum of the user's order totals
    #[schema(value_type = String)]
    pub total_paid: Decimal,
}

/// Site-wide row counts shown on the admin's own dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SiteStatsDto {
    pub products_count: i64,
    pub orders_count: i64,
    pub users_count: i64,
    pub rates_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DashboardStatsDto {
    User(UserStatsDto),
    Site(SiteStatsDto),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Profile page payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub user: UserSummaryDto,
    pub stats: DashboardStatsDto,
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderProductDto {
    pub id: i64,
    pub name: String,
    pub brand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderListItemDto {
    pub id: i64,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub sent: bool,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub product: OrderProductDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductListItemDto {
    pub id: i64,
    pub name: String,
    pub brand: String,
    /// Units in stock
    pub amount: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub category_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub orders_count: i64,
    #[schema(value_type = String)]
    pub orders_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserListItemDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub products_count: i64,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}
