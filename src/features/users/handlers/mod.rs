pub mod role_handler;

pub use role_handler::{__path_role_up, role_up};
