//! JWT issuance and verification.
//!
//! Tokens are HMAC-SHA256 signed and carry the identity fields downstream
//! consumers need: user id, email, name, and role. Lifetime and secret come
//! from configuration; nothing here reads the environment.

use evently_core::config::AuthConfig;
use evently_core::model::{User, UserRole};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject: user id
    pub sub: String,
    /// Issued at (Unix epoch seconds)
    pub iat: u64,
    /// Expiry (Unix epoch seconds)
    pub exp: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// Token errors.
///
/// The distinctions exist for audit logging; HTTP callers see a single 401
/// for all of them.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    #[error("token has expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,

    #[error("system time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

/// Token signing configuration, derived from [`AuthConfig`] at startup.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: u64,
    pub issuer: String,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            ttl_secs: auth.token_ttl_secs,
            issuer: auth.issuer.clone(),
        }
    }
}

/// Issue an access token for `user`.
///
/// Pure function of the user record, the configuration, and the clock.
pub fn issue_token(config: &JwtConfig, user: &User) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user.id.to_string(),
        iat: now,
        exp: now + config.ttl_secs,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: user.role,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify a token and extract its claims.
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-signing-secret".to_string(),
            ttl_secs: 3600,
            issuer: "evently-api".to_string(),
        }
    }

    fn test_user(role: UserRole) -> User {
        User::new(
            "a@x.com".to_string(),
            "$argon2id$fake".to_string(),
            role,
            "A".to_string(),
            "B".to_string(),
            "+639171234567".to_string(),
            "X".to_string(),
        )
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let config = test_config();
        let user = test_user(UserRole::User);

        let token = issue_token(&config, &user).expect("issue");
        let claims = verify_token(&config, &token).expect("verify");

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.iss, "evently-api");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn malformed_token_rejected() {
        let result = verify_token(&test_config(), "not.a.token");
        assert!(matches!(result, Err(JwtError::Malformed)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let config = test_config();
        let other = JwtConfig {
            secret: "different-secret".to_string(),
            ..test_config()
        };

        let token = issue_token(&config, &test_user(UserRole::Admin)).unwrap();
        let result = verify_token(&other, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn expired_token_rejected() {
        let config = test_config();
        let user = test_user(UserRole::User);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let claims = Claims {
            iss: config.issuer.clone(),
            sub: user.id.to_string(),
            iat: now - 7200,
            exp: now - 3600,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn claims_serialize_camel_case() {
        let config = test_config();
        let user = test_user(UserRole::Admin);
        let token = issue_token(&config, &user).unwrap();
        let claims = verify_token(&config, &token).unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("firstName").is_some());
        assert_eq!(json["role"], "Admin");
    }
}
