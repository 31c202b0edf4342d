use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::categories::models::Category;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.category_id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories, keeping the input order among siblings.
    ///
    /// Categories whose parent is not in the list are dropped along with their subtree.
    pub fn build_tree(categories: &[Category]) -> Vec<CategoryTreeDto> {
        Self::children_of(None, categories, 0)
    }

    fn children_of(parent: Option<i64>, all: &[Category], depth: usize) -> Vec<CategoryTreeDto> {
        // A parent cycle cannot be deeper than the list itself
        if depth > all.len() {
            return Vec::new();
        }

        all.iter()
            .filter(|c| c.category_id == parent)
            .map(|c| CategoryTreeDto {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                children: Self::children_of(Some(c.id), all, depth + 1),
            })
            .collect()
    }
}

/// A product in a category listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryProductDto {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub brand: String,
    pub amount: i32,
    #[schema(value_type = String, example = "125000.00")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}
