//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

use evently_core::config::AppConfig;
use evently_store::{EventRepository, GroupRepository, UserRepository};

use crate::auth::jwt::JwtConfig;
use crate::services::{EventService, GroupService, UserService};

/// Everything a handler can reach: the configuration, the services, and the
/// identity repository the auth gate resolves tokens against.
pub struct AppState {
    pub config: AppConfig,
    pub jwt: JwtConfig,
    pub users: UserService,
    pub events: EventService,
    pub groups: GroupService,
    /// User lookup handle for the authentication gate
    pub identities: Arc<dyn UserRepository>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services over a store implementing all three repositories.
    pub fn new<S>(config: AppConfig, store: Arc<S>) -> Arc<Self>
    where
        S: UserRepository + EventRepository + GroupRepository + 'static,
    {
        let jwt = JwtConfig::from(&config.auth);

        let user_repo: Arc<dyn UserRepository> = store.clone();
        let event_repo: Arc<dyn EventRepository> = store.clone();
        let group_repo: Arc<dyn GroupRepository> = store;

        let users = UserService::new(user_repo.clone(), jwt.clone(), config.hashing.clone());
        let events = EventService::new(event_repo.clone(), user_repo.clone());
        let groups = GroupService::new(group_repo, user_repo.clone(), event_repo);

        Arc::new(Self {
            config,
            jwt,
            users,
            events,
            groups,
            identities: user_repo,
            start_time: Instant::now(),
        })
    }
}
