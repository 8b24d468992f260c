//! Authentication gate.
//!
//! Extracts and verifies the bearer token, then resolves the identity by
//! re-fetching the user record. The token only proves possession; the store
//! is the authority on who the user currently is, so a role change or a
//! deleted account takes effect immediately instead of at token expiry.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use evently_core::model::{User, UserRole};
use evently_core::policy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::{audit_log, AuditEvent};
use crate::auth::jwt::{verify_token, JwtError};
use crate::error::ErrorBody;
use crate::state::AppState;

/// Identity attached to request extensions after the gate passes.
///
/// Built from the freshly fetched user record, never from token claims
/// alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        policy::is_admin(self.role)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Gate failures. Everything except `AdminRequired` is a 401; token-level
/// detail never reaches the response body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingAuthHeader,

    #[error("invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token verified but the user record is gone or the subject is garbage
    #[error("unknown identity")]
    UnknownIdentity,

    #[error("admin access required")]
    AdminRequired,

    #[error("identity lookup failed: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_)
            | AuthError::UnknownIdentity => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    code: "UNAUTHENTICATED".to_string(),
                    message: "Authentication required".to_string(),
                },
            ),
            AuthError::AdminRequired => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    success: false,
                    code: "FORBIDDEN".to_string(),
                    message: "Admin access required".to_string(),
                },
            ),
            AuthError::Internal(detail) => {
                tracing::error!(detail = %detail, "identity resolution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        code: "INTERNAL_ERROR".to_string(),
                        message: "Internal server error".to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resolve the bearer token in `headers` into a fresh identity.
async fn resolve_bearer(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = verify_token(&state.jwt, token).map_err(|e| {
        audit_log(&AuditEvent::InvalidToken {
            reason: e.to_string(),
        });
        AuthError::from(e)
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::UnknownIdentity)?;

    let user = state
        .identities
        .find_by_id(user_id)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            audit_log(&AuditEvent::InvalidToken {
                reason: "identity no longer exists".to_string(),
            });
            AuthError::UnknownIdentity
        })?;

    Ok(AuthenticatedUser::from(&user))
}

/// Require a valid token; attach the resolved identity to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = resolve_bearer(&state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Attach an identity when a valid token is present; otherwise pass the
/// request through anonymously.
///
/// The registration route uses this: anonymous registration is allowed, but
/// an authenticated admin may register another admin.
pub async fn optional_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Ok(user) = resolve_bearer(&state, request.headers()).await {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Require the already-attached identity to be an admin.
///
/// Layered outside `auth_middleware` on the admin-only user-management
/// routes.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(AuthError::MissingAuthHeader)?
        .clone();

    if !user.is_admin() {
        audit_log(&AuditEvent::AccessDenied {
            user_id: user.id,
            email: user.email.clone(),
            resource: request.uri().path().to_string(),
        });
        return Err(AuthError::AdminRequired);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "t@x.com".to_string(),
            first_name: "T".to_string(),
            last_name: "U".to_string(),
            role,
        }
    }

    #[test]
    fn identity_built_from_fresh_record() {
        let user = User::new(
            "a@x.com".to_string(),
            "$argon2id$fake".to_string(),
            UserRole::Admin,
            "A".to_string(),
            "B".to_string(),
            "+639171234567".to_string(),
            "X".to_string(),
        );
        let auth = AuthenticatedUser::from(&user);
        assert_eq!(auth.id, user.id);
        assert_eq!(auth.role, UserRole::Admin);
        assert!(auth.is_admin());
    }

    #[test]
    fn non_admin_identity_is_not_admin() {
        assert!(!identity(UserRole::User).is_admin());
    }

    #[test]
    fn auth_failures_hide_token_detail() {
        let response = AuthError::InvalidToken(JwtError::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::UnknownIdentity.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::AdminRequired.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
