use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::{
    OrderListItemDto, OrderProductDto, ProductListItemDto, SiteStatsDto, UserListItemDto,
    UserStatsDto,
};
use crate::shared::types::PageQuery;

/// Read-only reporting queries behind the dashboards.
///
/// Listings are newest first with ties broken by insertion order, and return
/// `(page_items, total_rows)`.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn user_stats(&self, user_id: i64) -> Result<UserStatsDto>;

    async fn site_stats(&self) -> Result<SiteStatsDto>;

    async fn list_user_orders(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<OrderListItemDto>, i64)>;

    async fn list_user_products(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)>;

    async fn list_users(&self, page: &PageQuery) -> Result<(Vec<UserListItemDto>, i64)>;
}

pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &'static str, user_id: Option<i64>) -> Result<i64> {
        let query = sqlx::query_scalar::<_, i64>(sql);
        let query = match user_id {
            Some(id) => query.bind(id),
            None => query,
        };

        query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to run count `{}`: {:?}", sql, e);
            AppError::Database(e)
        })
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: i64,
    total: Decimal,
    sent: bool,
    address: String,
    created_at: DateTime<Utc>,
    product_id: i64,
    product_name: String,
    product_brand: String,
}

impl From<OrderRow> for OrderListItemDto {
    fn from(r: OrderRow) -> Self {
        Self {
            id: r.id,
            total: r.total,
            sent: r.sent,
            address: r.address,
            created_at: r.created_at,
            product: OrderProductDto {
                id: r.product_id,
                name: r.product_name,
                brand: r.product_brand,
            },
        }
    }
}

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn user_stats(&self, user_id: i64) -> Result<UserStatsDto> {
        let total_paid = async {
            sqlx::query_scalar::<_, Decimal>(
                "SELECT COALESCE(SUM(total), 0) FROM orders WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to sum order totals: {:?}", e);
                AppError::Database(e)
            })
        };

        let (orders_count, sent_orders_count, products_count, total_paid) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM orders WHERE user_id = $1", Some(user_id)),
            self.count(
                "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND sent = TRUE",
                Some(user_id)
            ),
            self.count("SELECT COUNT(*) FROM products WHERE user_id = $1", Some(user_id)),
            total_paid,
        )?;

        Ok(UserStatsDto {
            orders_count,
            sent_orders_count,
            products_count,
            total_paid,
        })
    }

    async fn site_stats(&self) -> Result<SiteStatsDto> {
        let (products_count, orders_count, users_count, rates_count) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM products", None),
            self.count("SELECT COUNT(*) FROM orders", None),
            self.count("SELECT COUNT(*) FROM users", None),
            self.count("SELECT COUNT(*) FROM rates", None),
        )?;

        Ok(SiteStatsDto {
            products_count,
            orders_count,
            users_count,
            rates_count,
        })
    }

    async fn list_user_orders(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<OrderListItemDto>, i64)> {
        let total = self
            .count("SELECT COUNT(*) FROM orders WHERE user_id = $1", Some(user_id))
            .await?;

        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                o.id, o.total, o.sent, o.address, o.created_at,
                p.id AS product_id,
                p.name AS product_name,
                p.brand AS product_brand
            FROM orders o
            JOIN products p ON p.id = o.product_id
            WHERE o.user_id = $1
            ORDER BY o.created_at DESC, o.id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn list_user_products(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        let total = self
            .count(
                "SELECT COUNT(*) FROM products WHERE user_id = $1",
                Some(user_id),
            )
            .await?;

        let items = sqlx::query_as::<_, ProductListItemDto>(
            r#"
            SELECT
                p.id, p.name, p.brand, p.amount, p.price, p.category_slug, p.created_at,
                COUNT(o.id) AS orders_count,
                COALESCE(SUM(o.total), 0) AS orders_total
            FROM products p
            LEFT JOIN orders o ON o.product_id = p.id
            WHERE p.user_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC, p.id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    async fn list_users(&self, page: &PageQuery) -> Result<(Vec<UserListItemDto>, i64)> {
        let total = self.count("SELECT COUNT(*) FROM users", None).await?;

        let items = sqlx::query_as::<_, UserListItemDto>(
            r#"
            SELECT
                u.id, u.name, u.email, u.role, u.created_at,
                (SELECT COUNT(*) FROM products p WHERE p.user_id = u.id) AS products_count,
                (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS orders_count
            FROM users u
            ORDER BY u.created_at DESC, u.id ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }
}
