//! Public catalog browsing.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | Flat list, or nested tree with `?tree=true` |
//! | GET | `/api/categories/{slug}` | Single category |
//! | GET | `/api/categories/{slug}/products` | Products in a category, 40 per page |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{CategoryRepository, PgCategoryRepository};
pub use routes::routes;
pub use services::CategoryService;
