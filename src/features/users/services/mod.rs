mod role_service;

pub use role_service::RoleService;
