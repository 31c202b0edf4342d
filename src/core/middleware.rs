use crate::core::error::AppError;
use crate::features::auth::Authenticator;
use crate::shared::constants::REDIRECT_PARAM;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let authorized = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok())
                .and_then(|value| value.strip_prefix("Basic "))
                .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
                .and_then(|decoded| String::from_utf8(decoded).ok())
                .is_some_and(|creds| creds == *credentials);

            if authorized {
                return Ok(next.run(req).await);
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                Body::from("Unauthorized"),
            )
                .into_response())
        })
    }
}

/// API authentication: missing or invalid sessions get a 401 JSON error
pub async fn auth_middleware(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticator.authenticate(req.headers()).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// State for [`session_middleware`]
#[derive(Clone)]
pub struct SessionGate {
    pub authenticator: Arc<Authenticator>,
    pub login_url: Arc<str>,
}

/// Page authentication: missing or invalid sessions are sent to the login page
/// with a `302 Found`. Store failures still surface as errors.
pub async fn session_middleware(
    State(gate): State<SessionGate>,
    mut req: Request,
    next: Next,
) -> Response {
    match gate.authenticator.authenticate(req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(AppError::Unauthorized(_) | AppError::Auth(_)) => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            login_redirect(&gate.login_url, target)
        }
        Err(e) => e.into_response(),
    }
}

fn login_redirect(login_url: &str, target: &str) -> Response {
    let separator = if login_url.contains('?') { '&' } else { '?' };
    let location = format!(
        "{}{}{}={}",
        login_url,
        separator,
        REDIRECT_PARAM,
        urlencoding::encode(target)
    );

    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::Internal(format!("Invalid login URL: {}", login_url)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_location() {
        let response = login_redirect("/login", "/user/3/orders?page=2");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?redirect=%2Fuser%2F3%2Forders%3Fpage%3D2"
        );
    }

    #[test]
    fn test_login_redirect_keeps_existing_query() {
        let response = login_redirect("https://shop.example/login?lang=en", "/user/1/profile");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://shop.example/login?lang=en&redirect=%2Fuser%2F1%2Fprofile"
        );
    }
}
