//! Event endpoints.

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
use crate::services::events::{CreateEventRequest, UpdateEventRequest};
use crate::state::AppState;

/// All events, ascending by start time.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    responses(
        (status = 200, description = "Events retrieved"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list().await?;
    Ok(Json(ApiResponse::new("Events retrieved", events)))
}

/// Upcoming events only.
#[utoipa::path(
    get,
    path = "/api/events/upcoming",
    tag = "events",
    responses((status = 200, description = "Events retrieved")),
    security(("bearer_auth" = []))
)]
pub async fn list_upcoming(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list_upcoming().await?;
    Ok(Json(ApiResponse::new("Events retrieved", events)))
}

/// Create an event owned by the caller.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = crate::services::events::EventWithOwner),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 404, description = "Owner not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let event = state.events.create(request, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Event created", event)),
    ))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event retrieved", body = crate::services::events::EventWithOwner),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.get(id).await?;
    Ok(Json(ApiResponse::new("Event retrieved", event)))
}

/// Update an event. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = crate::services::events::EventWithOwner),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Not the owner", body = crate::error::ErrorBody),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let event = state.events.update(id, request, &user).await?;
    Ok(Json(ApiResponse::new("Event updated", event)))
}

/// Delete an event. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorBody),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete(id, &user).await?;
    Ok(Json(ApiResponse::new(
        "Event deleted",
        serde_json::json!({ "id": id }),
    )))
}

/// Events created by one user.
#[utoipa::path(
    get,
    path = "/api/events/user/{user_id}",
    tag = "events",
    params(("user_id" = Uuid, Path, description = "Owner id")),
    responses((status = 200, description = "Events retrieved")),
    security(("bearer_auth" = []))
)]
pub async fn list_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list_by_owner(user_id).await?;
    Ok(Json(ApiResponse::new("Events retrieved", events)))
}
