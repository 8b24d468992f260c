//! Repository traits, one per document collection.

use async_trait::async_trait;
use evently_core::model::{Event, EventStatus, Group, User, UserRole};
use uuid::Uuid;

use crate::error::StoreError;

/// User collection operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::DuplicateEmail`] if the
    /// email is already present; the check and the insert happen under the
    /// same collection lock.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Case-insensitive substring match on first or last name.
    async fn search_by_name(&self, query: &str) -> Result<Vec<User>, StoreError>;

    /// Overwrite the role, stamping the update time. Returns the updated
    /// record, or `None` if the user does not exist.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>, StoreError>;

    /// Overwrite the password hash, stamping the update time.
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<Option<User>, StoreError>;

    /// Whether any admin account exists (used by startup seeding).
    async fn admin_exists(&self) -> Result<bool, StoreError>;
}

/// Event collection operations. Listings come back ordered by ascending
/// start time.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: Event) -> Result<Event, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn list(&self) -> Result<Vec<Event>, StoreError>;

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, StoreError>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>, StoreError>;

    /// Replace the stored document with `event` (matched by id). Returns the
    /// stored record, or `None` if it does not exist.
    async fn update(&self, event: Event) -> Result<Option<Event>, StoreError>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Group collection operations. Visibility scoping is a policy concern and
/// happens above this layer.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn insert(&self, group: Group) -> Result<Group, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, StoreError>;

    async fn list(&self) -> Result<Vec<Group>, StoreError>;

    async fn update(&self, group: Group) -> Result<Option<Group>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
