//! In-memory document store.
//!
//! One `RwLock`-guarded map per collection. Holding the write lock for the
//! whole of an insert or update makes each single-document operation atomic,
//! which is the only consistency guarantee the services rely on. Sequences
//! that read one collection and then write another (for example the
//! admin-verify-then-insert in group creation) are not guarded here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use evently_core::model::{Event, EventStatus, Group, User, UserRole};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::repository::{EventRepository, GroupRepository, UserRepository};

/// In-process backend implementing all three repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    events: RwLock<HashMap<Uuid, Event>>,
    groups: RwLock<HashMap<Uuid, Group>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_start(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| e.start_date);
    events
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<User>, StoreError> {
        let needle = query.to_lowercase();
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| {
                u.first_name.to_lowercase().contains(&needle)
                    || u.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.password_hash = password_hash;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn admin_exists(&self) -> Result<bool, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.role == UserRole::Admin))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, event: Event) -> Result<Event, StoreError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        Ok(sorted_by_start(
            self.events.read().await.values().cloned().collect(),
        ))
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, StoreError> {
        Ok(sorted_by_start(
            self.events
                .read()
                .await
                .values()
                .filter(|e| e.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>, StoreError> {
        Ok(sorted_by_start(
            self.events
                .read()
                .await
                .values()
                .filter(|e| e.created_by == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, event: Event) -> Result<Option<Event>, StoreError> {
        let mut events = self.events.write().await;
        if !events.contains_key(&event.id) {
            return Ok(None);
        }
        events.insert(event.id, event.clone());
        Ok(Some(event))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn insert(&self, group: Group) -> Result<Group, StoreError> {
        self.groups.write().await.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, StoreError> {
        let mut groups: Vec<Group> = self.groups.read().await.values().cloned().collect();
        groups.sort_by_key(|g| g.created_at);
        Ok(groups)
    }

    async fn update(&self, group: Group) -> Result<Option<Group>, StoreError> {
        let mut groups = self.groups.write().await;
        if !groups.contains_key(&group.id) {
            return Ok(None);
        }
        groups.insert(group.id, group.clone());
        Ok(Some(group))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.groups.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(email: &str, role: UserRole) -> User {
        User::new(
            email.to_string(),
            "$argon2id$fake".to_string(),
            role,
            "First".to_string(),
            "Last".to_string(),
            "+639171234567".to_string(),
            "Addr".to_string(),
        )
    }

    fn event(owner: Uuid, start_offset_hours: i64) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            start_date: now + Duration::hours(start_offset_hours),
            end_date: now + Duration::hours(start_offset_hours + 1),
            location: "l".to_string(),
            status: EventStatus::Upcoming,
            category: evently_core::model::EventCategory::Meetup,
            max_attendees: 5,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_email_rejected_and_original_kept() {
        let store = MemoryStore::new();
        let first = UserRepository::insert(&store, user("a@x.com", UserRole::User))
            .await
            .unwrap();

        let result = UserRepository::insert(&store, user("a@x.com", UserRole::Admin)).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));

        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.role, UserRole::User);
    }

    #[tokio::test]
    async fn events_listed_in_start_order() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let late = EventRepository::insert(&store, event(owner, 10)).await.unwrap();
        let early = EventRepository::insert(&store, event(owner, 1)).await.unwrap();

        let listed = EventRepository::list(&store).await.unwrap();
        assert_eq!(listed[0].id, early.id);
        assert_eq!(listed[1].id, late.id);
    }

    #[tokio::test]
    async fn list_by_owner_filters_and_sorts() {
        let store = MemoryStore::new();
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        EventRepository::insert(&store, event(mine, 5)).await.unwrap();
        EventRepository::insert(&store, event(theirs, 1)).await.unwrap();
        EventRepository::insert(&store, event(mine, 2)).await.unwrap();

        let listed = store.list_by_owner(mine).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].start_date <= listed[1].start_date);
        assert!(listed.iter().all(|e| e.created_by == mine));
    }

    #[tokio::test]
    async fn update_missing_event_is_none() {
        let store = MemoryStore::new();
        let result = EventRepository::update(&store, event(Uuid::new_v4(), 1))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_role_stamps_update_time() {
        let store = MemoryStore::new();
        let created = UserRepository::insert(&store, user("b@x.com", UserRole::User))
            .await
            .unwrap();

        let updated = store
            .set_role(created.id, UserRole::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert!(updated.updated_at >= created.updated_at);
        assert!(store.admin_exists().await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_either_name_case_insensitively() {
        let store = MemoryStore::new();
        let mut u = user("c@x.com", UserRole::User);
        u.first_name = "Maria".to_string();
        u.last_name = "Santos".to_string();
        UserRepository::insert(&store, u).await.unwrap();

        assert_eq!(store.search_by_name("maria").await.unwrap().len(), 1);
        assert_eq!(store.search_by_name("SANT").await.unwrap().len(), 1);
        assert_eq!(store.search_by_name("zzz").await.unwrap().len(), 0);
    }
}
