//! User endpoints: registration, login, profile, and the admin-only
//! account management routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::services::users::{
    LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateRoleRequest,
};
use crate::state::AppState;

/// Register a new account.
///
/// Anonymous callers always get the `User` role. An authenticated admin may
/// set `role: "Admin"` to create another admin; the same field from anyone
/// else is ignored.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = evently_core::model::UserPublic),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::error::ErrorBody),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    actor: Option<Extension<AuthenticatedUser>>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let actor = actor.as_ref().map(|Extension(user)| user);
    let user = state.users.register(request, actor).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User registered", user)),
    ))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = crate::services::users::AuthenticatedSession),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let session = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(ApiResponse::new("Authenticated", session)))
}

/// Current user's profile.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "users",
    responses(
        (status = 200, description = "Profile retrieved", body = evently_core::model::UserPublic),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.users.profile(user.id).await?;
    Ok(Json(ApiResponse::new("Profile retrieved", profile)))
}

/// List every user. Admin only.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved"),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::new("Users retrieved", users)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring matched case-insensitively against first and last names
    pub name: String,
}

/// Search users by name. Admin only.
#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Users retrieved"),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users.search(&query.name).await?;
    Ok(Json(ApiResponse::new("Users retrieved", users)))
}

/// Change a user's role. Admin only.
#[utoipa::path(
    put,
    path = "/api/users/role",
    tag = "users",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = evently_core::model::UserPublic),
        (status = 400, description = "Invalid role", body = crate::error::ErrorBody),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let user = state
        .users
        .update_role(&admin, request.user_id, &request.role)
        .await?;

    Ok(Json(ApiResponse::new("Role updated", user)))
}

/// Reset a user's password. Admin only.
#[utoipa::path(
    put,
    path = "/api/users/password",
    tag = "users",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    state
        .users
        .reset_password(&admin, request.user_id, &request.new_password)
        .await?;

    Ok(Json(ApiResponse::new(
        "Password reset",
        serde_json::json!({ "userId": request.user_id }),
    )))
}
