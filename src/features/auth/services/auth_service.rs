use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::validator::JwtValidator;
use crate::features::users::repositories::UserRepository;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for authentication operations (login)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    validator: Arc<JwtValidator>,
    secure_cookie: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        validator: Arc<JwtValidator>,
        secure_cookie: bool,
    ) -> Self {
        Self {
            users,
            validator,
            secure_cookie,
        }
    }

    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| {
                tracing::info!("Login attempt for unknown email");
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        let hash = user.password_hash.clone();
        let password = dto.password;
        // CPU bound
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        if !valid {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.validator.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: AuthenticatedUser::from(user),
        })
    }
}
