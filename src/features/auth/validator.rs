use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issues and validates the HS256 session tokens handed out at login
pub struct JwtValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: u64,
    leeway: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    iat: u64,
    exp: u64,
}

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue_token(&self, user_id: i64) -> Result<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.sign(user_id, now, now + self.ttl_secs)
    }

    fn sign(&self, user_id: i64, iat: u64, exp: u64) -> Result<IssuedToken> {
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat,
            exp,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: exp.saturating_sub(iat),
        })
    }

    /// Validate signature, issuer and expiry. Returns the user id from `sub`.
    pub fn validate_token(&self, token: &str) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Auth("Token subject is not a user id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(secret: &str, issuer: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: issuer.to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(5),
            secure_cookie: false,
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let validator = JwtValidator::new(&config("secret", "lapak-core"));
        let token = validator.issue_token(42).unwrap();

        assert_eq!(token.expires_in, 3600);
        assert_eq!(validator.validate_token(&token.access_token).unwrap(), 42);
    }

    #[test]
    fn test_rejects_other_secret() {
        let issuer = JwtValidator::new(&config("secret-a", "lapak-core"));
        let validator = JwtValidator::new(&config("secret-b", "lapak-core"));
        let token = issuer.issue_token(1).unwrap();

        assert!(matches!(
            validator.validate_token(&token.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_rejects_other_issuer() {
        let issuer = JwtValidator::new(&config("secret", "someone-else"));
        let validator = JwtValidator::new(&config("secret", "lapak-core"));
        let token = issuer.issue_token(1).unwrap();

        assert!(validator.validate_token(&token.access_token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let validator = JwtValidator::new(&config("secret", "lapak-core"));
        let now = Utc::now().timestamp() as u64;
        let token = validator.sign(1, now - 7200, now - 3600).unwrap();

        assert!(validator.validate_token(&token.access_token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let validator = JwtValidator::new(&config("secret", "lapak-core"));
        assert!(validator.validate_token("not-a-token").is_err());
    }
}
