use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::validator::JwtValidator;
use crate::features::users::repositories::UserRepository;
use crate::shared::constants::AUTH_COOKIE;

/// Resolves the request's session token into the current actor.
///
/// The bearer header wins over the cookie. The user row is loaded on every
/// request, so role changes apply without logging in again.
pub struct Authenticator {
    validator: Arc<JwtValidator>,
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(validator: Arc<JwtValidator>, users: Arc<dyn UserRepository>) -> Self {
        Self { validator, users }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser> {
        let token = extract_token(headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let user_id = self.validator.validate_token(&token)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Auth(format!("User {} no longer exists", user_id)))?;

        Ok(user.into())
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }

    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def"),
        );
        assert_eq!(extract_token(&headers), Some("abc.def".to_string()));
    }

    #[test]
    fn test_non_bearer_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=xyz"),
        );
        assert_eq!(extract_token(&headers), Some("xyz".to_string()));
    }
}
