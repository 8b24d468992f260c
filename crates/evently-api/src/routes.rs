//! API route definitions.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::middleware::{auth_middleware, optional_auth_middleware, require_admin};
use crate::handlers::{events, groups, users};
use crate::state::AppState;

/// Assemble the `/api` route tree.
///
/// Four route sets with different gates: fully public (login), optionally
/// authenticated (register, so an admin can mint another admin),
/// authenticated, and authenticated-plus-admin for user management. Group
/// admin checks live in the service, after the fetch, so 404 and 403 stay
/// distinguishable.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new().route("/users/login", post(users::login));

    let register_routes = Router::new()
        .route("/users/register", post(users::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let protected_routes = Router::new()
        .route("/users/profile", get(users::profile))
        // Event endpoints
        .route("/events", get(events::list).post(events::create))
        .route("/events/upcoming", get(events::list_upcoming))
        .route("/events/user/:user_id", get(events::list_by_user))
        .route(
            "/events/:id",
            get(events::get).put(events::update).delete(events::remove),
        )
        // Group endpoints
        .route("/groups", get(groups::list).post(groups::create))
        .route(
            "/groups/:id",
            get(groups::get).put(groups::update).delete(groups::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/search", get(users::search))
        .route("/users/role", put(users::update_role))
        .route("/users/password", put(users::reset_password))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(register_routes)
        .merge(protected_routes)
        .merge(admin_routes)
}
