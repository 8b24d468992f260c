//! Group endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::services::groups::{CreateGroupRequest, UpdateGroupRequest};
use crate::state::AppState;

/// Create a group. Admin only; the caller becomes the owner.
#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = evently_core::model::Group),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<CreateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let group = state.groups.create(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Group created", group)),
    ))
}

/// Groups visible to the caller, with owner and events.
#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "groups",
    responses(
        (status = 200, description = "Groups retrieved"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let groups = state.groups.list(&user).await?;
    Ok(Json(ApiResponse::new("Groups retrieved", groups)))
}

/// Fetch one group, visibility permitting.
#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group retrieved", body = crate::services::groups::GroupWithOwner),
        (status = 404, description = "Group not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let group = state.groups.get(&user, id).await?;
    Ok(Json(ApiResponse::new("Group retrieved", group)))
}

/// Update a group. Admin only.
#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group id")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = evently_core::model::Group),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
        (status = 404, description = "Group not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<UpdateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let group = state.groups.update(&user, id, request).await?;
    Ok(Json(ApiResponse::new("Group updated", group)))
}

/// Delete a group. Admin only.
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
        (status = 404, description = "Group not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    state.groups.delete(&user, id).await?;
    Ok(Json(ApiResponse::new(
        "Group deleted",
        serde_json::json!({ "id": id }),
    )))
}
