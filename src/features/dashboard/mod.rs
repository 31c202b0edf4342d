pub mod dtos;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{DashboardRepository, PgDashboardRepository};
pub use routes::routes;
pub use services::DashboardService;
