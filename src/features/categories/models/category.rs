use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for category. `category_id` is the parent category.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}
