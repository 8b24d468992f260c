//! Group service: admin-gated management with visibility-scoped reads.
//!
//! `created_by` is never client-supplied; the request type has no such
//! field and the service stamps the acting admin's id. The visibility
//! predicate applies to single-resource fetches as well as listings, and a
//! non-visible group reads as 404 so its existence is not disclosed.

use std::sync::Arc;

use chrono::Utc;
use evently_core::model::{Event, Group, OwnerSummary, Visibility};
use evently_core::policy;
use evently_store::{EventRepository, GroupRepository, UserRepository};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::audit::{audit_log, AuditEvent};
use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;

/// Group creation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub visibility: Option<Visibility>,
    #[validate(range(min = 1, message = "Max events must be a positive number"))]
    pub max_events: Option<u32>,
}

/// Partial group update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    #[validate(range(min = 1, message = "Max events must be a positive number"))]
    pub max_events: Option<u32>,
}

/// Group joined with its owner's abbreviated profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupWithOwner {
    #[serde(flatten)]
    pub group: Group,
    pub owner: OwnerSummary,
}

/// Listing entry: group, owner, and the owner's events.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupWithDetails {
    #[serde(flatten)]
    pub group: Group,
    pub owner: OwnerSummary,
    pub events: Vec<Event>,
}

/// Group business logic over the group, user, and event repositories.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            groups,
            users,
            events,
        }
    }

    /// Create a group owned by the acting admin.
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateGroupRequest,
    ) -> Result<Group, AppError> {
        if !policy::can_create_group(actor.role) {
            audit_log(&AuditEvent::AccessDenied {
                user_id: actor.id,
                email: actor.email.clone(),
                resource: "group:create".to_string(),
            });
            return Err(AppError::Forbidden(
                "Only admins can create groups".to_string(),
            ));
        }

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            created_by: actor.id,
            visibility: request.visibility.unwrap_or_default(),
            max_events: request.max_events.unwrap_or(10),
            created_at: now,
            updated_at: now,
        };

        let created = self.groups.insert(group).await?;
        tracing::debug!(group_id = %created.id, admin = %actor.id, "group created");
        Ok(created)
    }

    /// Groups visible to `actor`, each joined with its owner and the
    /// owner's events. One event fetch per group: a fan-out read, not a
    /// join.
    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<GroupWithDetails>, AppError> {
        let groups = self.groups.list().await?;

        let mut visible = Vec::new();
        for group in groups {
            if !policy::group_visible_to(actor.role, &group) {
                continue;
            }
            let Some(owner) = self.users.find_by_id(group.created_by).await? else {
                tracing::warn!(group_id = %group.id, owner = %group.created_by, "skipping group with missing owner");
                continue;
            };
            let events = self.events.list_by_owner(group.created_by).await?;
            visible.push(GroupWithDetails {
                owner: owner.owner_summary(),
                events,
                group,
            });
        }

        Ok(visible)
    }

    /// Fetch one group, applying the same visibility predicate as the
    /// listing.
    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<GroupWithOwner, AppError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Group"))?;

        if !policy::group_visible_to(actor.role, &group) {
            return Err(AppError::NotFound("Group"));
        }

        let owner = self
            .users
            .find_by_id(group.created_by)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("owner {} missing for group {}", group.created_by, group.id))
            })?;

        Ok(GroupWithOwner {
            owner: owner.owner_summary(),
            group,
        })
    }

    /// Apply a partial update. Admin-only, same gate as creation.
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        patch: UpdateGroupRequest,
    ) -> Result<Group, AppError> {
        let mut group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Group"))?;

        self.check_manage_gate(actor, &group, "group:update")?;

        if let Some(name) = patch.name {
            group.name = name;
        }
        if let Some(description) = patch.description {
            group.description = description;
        }
        if let Some(visibility) = patch.visibility {
            group.visibility = visibility;
        }
        if let Some(max_events) = patch.max_events {
            group.max_events = max_events;
        }
        group.updated_at = Utc::now();

        self.groups
            .update(group)
            .await?
            .ok_or(AppError::NotFound("Group"))
    }

    /// Hard delete. Admin-only.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Group"))?;

        self.check_manage_gate(actor, &group, "group:delete")?;

        self.groups.delete(id).await?;
        tracing::debug!(group_id = %id, admin = %actor.id, "group deleted");
        Ok(())
    }

    fn check_manage_gate(
        &self,
        actor: &AuthenticatedUser,
        group: &Group,
        resource: &str,
    ) -> Result<(), AppError> {
        if policy::can_manage_group(actor.role) {
            return Ok(());
        }
        audit_log(&AuditEvent::AccessDenied {
            user_id: actor.id,
            email: actor.email.clone(),
            resource: format!("{resource}:{}", group.id),
        });
        Err(AppError::Forbidden(
            "Only admins can manage groups".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evently_core::model::{User, UserRole};
    use evently_store::MemoryStore;

    struct Fixture {
        service: GroupService,
        store: Arc<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            service: GroupService::new(store.clone(), store.clone(), store.clone()),
            store,
        }
    }

    async fn seed_user(store: &Arc<MemoryStore>, email: &str, role: UserRole) -> User {
        let user = User::new(
            email.to_string(),
            "$argon2id$fake".to_string(),
            role,
            "First".to_string(),
            "Last".to_string(),
            "+639171234567".to_string(),
            "Addr".to_string(),
        );
        UserRepository::insert(store.as_ref(), user).await.unwrap()
    }

    fn identity(user: &User) -> AuthenticatedUser {
        AuthenticatedUser::from(user)
    }

    fn create_request(name: &str, visibility: Option<Visibility>) -> CreateGroupRequest {
        CreateGroupRequest {
            name: name.to_string(),
            description: "desc desc desc".to_string(),
            visibility,
            max_events: Some(5),
        }
    }

    #[tokio::test]
    async fn non_admin_create_is_forbidden() {
        let fx = fixture();
        let user = seed_user(&fx.store, "u@x.com", UserRole::User).await;

        let result = fx
            .service
            .create(&identity(&user), create_request("G", None))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn create_stamps_acting_admin_as_owner() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;

        let group = fx
            .service
            .create(&identity(&admin), create_request("G", Some(Visibility::Private)))
            .await
            .unwrap();

        assert_eq!(group.created_by, admin.id);
        assert_eq!(group.visibility, Visibility::Private);
        assert_eq!(group.max_events, 5);
    }

    #[tokio::test]
    async fn create_defaults_visibility_and_max_events() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;

        let group = fx
            .service
            .create(
                &identity(&admin),
                CreateGroupRequest {
                    name: "G".to_string(),
                    description: "d".to_string(),
                    visibility: None,
                    max_events: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(group.visibility, Visibility::Public);
        assert_eq!(group.max_events, 10);
    }

    #[tokio::test]
    async fn listing_is_visibility_scoped() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;
        let user = seed_user(&fx.store, "u@x.com", UserRole::User).await;

        fx.service
            .create(&identity(&admin), create_request("Open", Some(Visibility::Public)))
            .await
            .unwrap();
        fx.service
            .create(&identity(&admin), create_request("Hidden", Some(Visibility::Private)))
            .await
            .unwrap();

        let for_admin = fx.service.list(&identity(&admin)).await.unwrap();
        assert_eq!(for_admin.len(), 2);

        let for_user = fx.service.list(&identity(&user)).await.unwrap();
        assert_eq!(for_user.len(), 1);
        assert_eq!(for_user[0].group.name, "Open");
        assert!(for_user
            .iter()
            .all(|g| g.group.visibility != Visibility::Private));
    }

    #[tokio::test]
    async fn listing_joins_owner_and_their_events() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;
        fx.service
            .create(&identity(&admin), create_request("G", None))
            .await
            .unwrap();

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            start_date: now,
            end_date: now + chrono::Duration::hours(1),
            location: "l".to_string(),
            status: evently_core::model::EventStatus::Upcoming,
            category: evently_core::model::EventCategory::Workshop,
            max_attendees: 5,
            created_by: admin.id,
            created_at: now,
            updated_at: now,
        };
        EventRepository::insert(fx.store.as_ref(), event).await.unwrap();

        let listed = fx.service.list(&identity(&admin)).await.unwrap();
        assert_eq!(listed[0].owner.id, admin.id);
        assert_eq!(listed[0].events.len(), 1);
    }

    #[tokio::test]
    async fn private_group_reads_as_missing_for_non_admin() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;
        let user = seed_user(&fx.store, "u@x.com", UserRole::User).await;

        let hidden = fx
            .service
            .create(&identity(&admin), create_request("H", Some(Visibility::Private)))
            .await
            .unwrap();

        let result = fx.service.get(&identity(&user), hidden.id).await;
        assert!(matches!(result, Err(AppError::NotFound("Group"))));

        let visible = fx.service.get(&identity(&admin), hidden.id).await.unwrap();
        assert_eq!(visible.group.id, hidden.id);
    }

    #[tokio::test]
    async fn update_and_delete_are_admin_only() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;
        let user = seed_user(&fx.store, "u@x.com", UserRole::User).await;

        let group = fx
            .service
            .create(&identity(&admin), create_request("G", None))
            .await
            .unwrap();

        let patch = UpdateGroupRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let result = fx.service.update(&identity(&user), group.id, patch.clone()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let updated = fx.service.update(&identity(&admin), group.id, patch).await.unwrap();
        assert_eq!(updated.name, "Renamed");

        let result = fx.service.delete(&identity(&user), group.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        fx.service.delete(&identity(&admin), group.id).await.unwrap();
        let result = fx.service.get(&identity(&admin), group.id).await;
        assert!(matches!(result, Err(AppError::NotFound("Group"))));
    }

    #[tokio::test]
    async fn missing_group_is_not_found_for_admin_update() {
        let fx = fixture();
        let admin = seed_user(&fx.store, "a@x.com", UserRole::Admin).await;

        let result = fx
            .service
            .update(&identity(&admin), Uuid::new_v4(), UpdateGroupRequest::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound("Group"))));
    }
}
