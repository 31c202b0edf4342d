use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryProductDto, CategoryResponseDto, CategoryTreeDto,
};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::types::PageQuery;

/// Service for category operations
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// List all categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.categories.list().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.categories.list().await?;
        Ok(CategoryTreeDto::build_tree(&categories))
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        self.find(slug).await.map(Into::into)
    }

    pub async fn list_products(
        &self,
        slug: &str,
        page: &PageQuery,
    ) -> Result<(Vec<CategoryProductDto>, i64)> {
        let category = self.find(slug).await?;
        self.categories.list_products(category.id, page).await
    }

    async fn find(&self, slug: &str) -> Result<Category> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }
}
