/// Rows per page for every dashboard listing
pub const PAGE_SIZE: i64 = 40;

/// Cookie carrying the session token for browser dashboards
pub const AUTH_COOKIE: &str = "auth_token";

/// Query parameter appended to the login URL so the login page can send the user back
pub const REDIRECT_PARAM: &str = "redirect";
