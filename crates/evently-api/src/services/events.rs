//! Event service: CRUD with the date-range invariant and the
//! owner-or-admin mutation gate.
//!
//! Mutation always fetches the record first, so an absent event reads as
//! 404 and a foreign one as 403, never the other way around.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use evently_core::model::{Event, EventCategory, EventStatus, OwnerSummary};
use evently_core::policy;
use evently_store::{EventRepository, UserRepository};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::audit::{audit_log, AuditEvent};
use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;

/// Event creation request. Status is not accepted: new events are always
/// `upcoming`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub category: EventCategory,
    #[validate(range(min = 1, message = "Max attendees must be a positive number"))]
    pub max_attendees: u32,
}

/// Partial event update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
    #[validate(range(min = 1, message = "Max attendees must be a positive number"))]
    pub max_attendees: Option<u32>,
}

/// Event joined with its owner's abbreviated profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventWithOwner {
    #[serde(flatten)]
    pub event: Event,
    pub owner: OwnerSummary,
}

/// Event business logic over the event and user repositories.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { events, users }
    }

    /// Create an event owned by `owner_id`.
    pub async fn create(
        &self,
        request: CreateEventRequest,
        owner_id: Uuid,
    ) -> Result<EventWithOwner, AppError> {
        let owner = self
            .users
            .find_by_id(owner_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        check_date_range(request.start_date, request.end_date)?;

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            location: request.location,
            status: EventStatus::Upcoming,
            category: request.category,
            max_attendees: request.max_attendees,
            created_by: owner_id,
            created_at: now,
            updated_at: now,
        };

        let created = self.events.insert(event).await?;
        tracing::debug!(event_id = %created.id, owner = %owner_id, "event created");

        Ok(EventWithOwner {
            event: created,
            owner: owner.owner_summary(),
        })
    }

    /// All events, ascending by start time, each joined with its owner.
    pub async fn list(&self) -> Result<Vec<EventWithOwner>, AppError> {
        let events = self.events.list().await?;
        self.join_owners(events).await
    }

    /// Upcoming events, ascending by start time.
    pub async fn list_upcoming(&self) -> Result<Vec<EventWithOwner>, AppError> {
        let events = self.events.list_by_status(EventStatus::Upcoming).await?;
        self.join_owners(events).await
    }

    pub async fn get(&self, id: Uuid) -> Result<EventWithOwner, AppError> {
        let event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;
        let owner = self.owner_of(&event).await?;
        Ok(EventWithOwner { event, owner })
    }

    /// Apply a partial update. Owner-or-admin only; the date-range invariant
    /// is re-checked against the resulting combination of patch and stored
    /// fields whenever either date moves.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateEventRequest,
        actor: &AuthenticatedUser,
    ) -> Result<EventWithOwner, AppError> {
        let mut event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;

        self.check_mutation_gate(actor, &event, "event:update")?;

        if patch.start_date.is_some() || patch.end_date.is_some() {
            let start = patch.start_date.unwrap_or(event.start_date);
            let end = patch.end_date.unwrap_or(event.end_date);
            check_date_range(start, end)?;
        }

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(start_date) = patch.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            event.end_date = end_date;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(status) = patch.status {
            event.status = status;
        }
        if let Some(category) = patch.category {
            event.category = category;
        }
        if let Some(max_attendees) = patch.max_attendees {
            event.max_attendees = max_attendees;
        }
        event.updated_at = Utc::now();

        let stored = self
            .events
            .update(event)
            .await?
            .ok_or(AppError::NotFound("Event"))?;
        let owner = self.owner_of(&stored).await?;

        Ok(EventWithOwner {
            event: stored,
            owner,
        })
    }

    /// Hard delete, same gate as update.
    pub async fn delete(&self, id: Uuid, actor: &AuthenticatedUser) -> Result<(), AppError> {
        let event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;

        self.check_mutation_gate(actor, &event, "event:delete")?;

        self.events.delete(id).await?;
        tracing::debug!(event_id = %id, actor = %actor.id, "event deleted");
        Ok(())
    }

    /// Events created by `owner_id`, ascending by start time.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>, AppError> {
        Ok(self.events.list_by_owner(owner_id).await?)
    }

    fn check_mutation_gate(
        &self,
        actor: &AuthenticatedUser,
        event: &Event,
        resource: &str,
    ) -> Result<(), AppError> {
        if policy::can_mutate_event(actor.id, actor.role, event) {
            return Ok(());
        }
        audit_log(&AuditEvent::AccessDenied {
            user_id: actor.id,
            email: actor.email.clone(),
            resource: format!("{resource}:{}", event.id),
        });
        Err(AppError::Forbidden(
            "You can only modify your own events".to_string(),
        ))
    }

    async fn owner_of(&self, event: &Event) -> Result<OwnerSummary, AppError> {
        let owner = self
            .users
            .find_by_id(event.created_by)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("owner {} missing for event {}", event.created_by, event.id))
            })?;
        Ok(owner.owner_summary())
    }

    async fn join_owners(&self, events: Vec<Event>) -> Result<Vec<EventWithOwner>, AppError> {
        let mut joined = Vec::with_capacity(events.len());
        for event in events {
            match self.users.find_by_id(event.created_by).await? {
                Some(owner) => joined.push(EventWithOwner {
                    owner: owner.owner_summary(),
                    event,
                }),
                None => {
                    tracing::warn!(event_id = %event.id, owner = %event.created_by, "skipping event with missing owner");
                }
            }
        }
        Ok(joined)
    }
}

fn check_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::Validation(
            "End date must be after start date".to_string(),
        ));
    }
    Ok(())
}
