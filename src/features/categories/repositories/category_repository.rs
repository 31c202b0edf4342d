use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryProductDto;
use crate::features::categories::models::Category;
use crate::shared::types::PageQuery;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Products attached through `category_product`, newest first
    async fn list_products(
        &self,
        category_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<CategoryProductDto>, i64)>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_id, name, slug, created_at
            FROM categories
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_id, name, slug, created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_products(
        &self,
        category_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<CategoryProductDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM category_product WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count products in category {}: {:?}", category_id, e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, CategoryProductDto>(
            r#"
            SELECT
                p.id, p.user_id AS seller_id, p.name, p.brand, p.amount, p.price, p.created_at
            FROM products p
            JOIN category_product cp ON cp.product_id = p.id
            WHERE cp.category_id = $1
            ORDER BY p.created_at DESC, p.id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(category_id)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products in category {}: {:?}", category_id, e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }
}
