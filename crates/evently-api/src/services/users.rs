//! User service: registration, authentication, profiles, and the admin-only
//! account operations.

use std::sync::Arc;

use evently_core::config::{AdminBootstrap, HashingConfig};
use evently_core::model::{User, UserPublic, UserRole};
use evently_store::UserRepository;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::audit::{audit_log, AuditEvent};
use crate::auth::jwt::{issue_token, JwtConfig};
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;

/// Registration request.
///
/// `role` is advisory: it is honored only when the caller is an
/// authenticated admin. Anonymous and non-admin callers always get `User`,
/// whatever the body says.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "validate_mobile"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub role: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Admin request to change a user's role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: Uuid,
    pub role: String,
}

/// Admin request to reset a user's password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub user_id: Uuid,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Successful login payload: the token plus the public profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedSession {
    pub token: String,
    pub user: UserPublic,
}

/// Philippine mobile pattern: `+63` or `0`, then `9` and nine digits.
fn validate_mobile(phone: &str) -> Result<(), ValidationError> {
    let rest = phone
        .strip_prefix("+63")
        .or_else(|| phone.strip_prefix('0'));

    let valid = matches!(
        rest,
        Some(digits)
            if digits.len() == 10
                && digits.starts_with('9')
                && digits.chars().all(|c| c.is_ascii_digit())
    );

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Please enter a valid Philippine mobile number".into());
        Err(err)
    }
}

/// User business logic over the user repository.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
    hashing: HashingConfig,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig, hashing: HashingConfig) -> Self {
        Self {
            users,
            jwt,
            hashing,
        }
    }

    /// Register a new account.
    ///
    /// Email uniqueness is enforced by the repository insert; a duplicate
    /// surfaces as 409 and leaves the existing record untouched. The role
    /// escalation guard lives here: only an authenticated admin can mint
    /// another admin.
    pub async fn register(
        &self,
        request: RegisterRequest,
        actor: Option<&AuthenticatedUser>,
    ) -> Result<UserPublic, AppError> {
        let role = self.resolve_requested_role(request.role.as_deref(), actor)?;

        let password_hash = hash_password(&request.password, &self.hashing)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        let user = User::new(
            request.email,
            password_hash,
            role,
            request.first_name,
            request.last_name,
            request.phone,
            request.address,
        );

        let created = self.users.insert(user).await?;

        audit_log(&AuditEvent::RegistrationSuccess {
            user_id: created.id,
            email: created.email.clone(),
            role: created.role.to_string(),
        });

        Ok(created.to_public())
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password return the identical error, so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                audit_log(&AuditEvent::LoginFailure {
                    email: email.to_string(),
                    reason: "unknown email".to_string(),
                });
                return Err(AppError::InvalidCredentials);
            }
        };

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("failed to verify password: {e}")))?;

        if !valid {
            audit_log(&AuditEvent::LoginFailure {
                email: email.to_string(),
                reason: "wrong password".to_string(),
            });
            return Err(AppError::InvalidCredentials);
        }

        let token = issue_token(&self.jwt, &user)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))?;

        audit_log(&AuditEvent::LoginSuccess {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthenticatedSession {
            token,
            user: user.to_public(),
        })
    }

    pub async fn profile(&self, id: Uuid) -> Result<UserPublic, AppError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(user.to_public())
    }

    pub async fn list(&self) -> Result<Vec<UserPublic>, AppError> {
        let users = self.users.list().await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    pub async fn search(&self, name: &str) -> Result<Vec<UserPublic>, AppError> {
        let users = self.users.search_by_name(name).await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    /// Change a user's role. The route is admin-gated; `role` must name one
    /// of the two roles.
    pub async fn update_role(
        &self,
        admin: &AuthenticatedUser,
        user_id: Uuid,
        role: &str,
    ) -> Result<UserPublic, AppError> {
        let role = UserRole::parse(role)
            .ok_or_else(|| AppError::Validation("Role must be either Admin or User".to_string()))?;

        let updated = self
            .users
            .set_role(user_id, role)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        audit_log(&AuditEvent::RoleChanged {
            admin_id: admin.id,
            user_id,
            role: role.to_string(),
        });

        Ok(updated.to_public())
    }

    /// Overwrite a user's password with a fresh hash. Admin-gated route.
    pub async fn reset_password(
        &self,
        admin: &AuthenticatedUser,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        let password_hash = hash_password(new_password, &self.hashing)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        self.users
            .set_password_hash(user_id, password_hash)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        audit_log(&AuditEvent::PasswordReset {
            admin_id: admin.id,
            user_id,
        });

        Ok(())
    }

    /// Seed the configured admin account if no admin exists yet.
    pub async fn ensure_admin(&self, bootstrap: &AdminBootstrap) -> Result<(), AppError> {
        if self.users.admin_exists().await? {
            return Ok(());
        }

        let password_hash = hash_password(&bootstrap.password, &self.hashing)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        let admin = User::new(
            bootstrap.email.clone(),
            password_hash,
            UserRole::Admin,
            bootstrap.first_name.clone(),
            bootstrap.last_name.clone(),
            bootstrap.phone.clone(),
            bootstrap.address.clone(),
        );

        let created = self.users.insert(admin).await?;
        tracing::info!(email = %created.email, "seeded admin account");
        Ok(())
    }

    fn resolve_requested_role(
        &self,
        requested: Option<&str>,
        actor: Option<&AuthenticatedUser>,
    ) -> Result<UserRole, AppError> {
        match requested {
            None => Ok(UserRole::User),
            Some(name) => {
                let role = UserRole::parse(name).ok_or_else(|| {
                    AppError::Validation("Role must be either Admin or User".to_string())
                })?;
                // Self-escalation guard: Admin sticks only for admin callers.
                if role == UserRole::Admin && !actor.is_some_and(AuthenticatedUser::is_admin) {
                    return Ok(UserRole::User);
                }
                Ok(role)
            }
        }
    }
}
