//! Evently API: REST server for event and group management.
//!
//! Request flow: authentication gate (token → fresh identity) → request
//! validation → handler → service (business rules + authorization policy)
//! → repository.

pub mod audit;
pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use evently_core::config::{AdminBootstrap, AppConfig, ServerConfig};
use evently_store::MemoryStore;

use crate::middleware::security_headers_middleware;
use crate::state::AppState;

/// OpenAPI documentation for the whole surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::users::register,
        handlers::users::login,
        handlers::users::profile,
        handlers::users::list,
        handlers::users::search,
        handlers::users::update_role,
        handlers::users::reset_password,
        handlers::events::list,
        handlers::events::list_upcoming,
        handlers::events::create,
        handlers::events::get,
        handlers::events::update,
        handlers::events::remove,
        handlers::events::list_by_user,
        handlers::groups::create,
        handlers::groups::list,
        handlers::groups::get,
        handlers::groups::update,
        handlers::groups::remove,
    ),
    components(schemas(
        evently_core::model::UserPublic,
        evently_core::model::UserRole,
        evently_core::model::OwnerSummary,
        evently_core::model::Event,
        evently_core::model::EventStatus,
        evently_core::model::EventCategory,
        evently_core::model::Group,
        evently_core::model::Visibility,
        services::users::RegisterRequest,
        services::users::LoginRequest,
        services::users::UpdateRoleRequest,
        services::users::ResetPasswordRequest,
        services::users::AuthenticatedSession,
        services::events::CreateEventRequest,
        services::events::UpdateEventRequest,
        services::events::EventWithOwner,
        services::groups::CreateGroupRequest,
        services::groups::UpdateGroupRequest,
        services::groups::GroupWithOwner,
        services::groups::GroupWithDetails,
        handlers::health::HealthResponse,
        error::ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login, and account management"),
        (name = "events", description = "Event CRUD"),
        (name = "groups", description = "Admin-managed groups"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router over a fresh in-memory store with light hashing and a seeded
/// admin (`admin@evently.test` / `AdminPass123!`). Integration tests drive
/// this through the HTTP surface exactly like a deployment.
pub async fn create_router_for_testing() -> Router {
    let mut config = AppConfig::for_testing();
    config.admin = Some(AdminBootstrap {
        email: "admin@evently.test".to_string(),
        password: "AdminPass123!".to_string(),
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        phone: "+639171234567".to_string(),
        address: "Head Office".to_string(),
    });

    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    if let Some(bootstrap) = state.config.admin.clone() {
        state
            .users
            .ensure_admin(&bootstrap)
            .await
            .expect("failed to seed test admin");
    }

    create_router(state)
}
