//! Authorization policy.
//!
//! Every decision the system makes about who may do what lives here as a
//! total, stateless function over the actor's identity and the resource.
//! Callers translate a `false` into a 403; this module never touches HTTP
//! or storage.

use crate::model::{Event, Group, UserRole, Visibility};
use uuid::Uuid;

/// Admin check, the root of most other decisions.
pub fn is_admin(role: UserRole) -> bool {
    role == UserRole::Admin
}

/// Events are mutable by their owner or by any admin.
pub fn can_mutate_event(actor_id: Uuid, actor_role: UserRole, event: &Event) -> bool {
    is_admin(actor_role) || event.created_by == actor_id
}

/// Group creation is reserved to admins.
pub fn can_create_group(role: UserRole) -> bool {
    is_admin(role)
}

/// Group update and delete carry the same gate as creation.
pub fn can_manage_group(role: UserRole) -> bool {
    is_admin(role)
}

/// Visibility scoping for group reads: admins see everything, everyone else
/// sees public groups only. Applied to listings and to single-resource
/// fetches alike.
pub fn group_visible_to(role: UserRole, group: &Group) -> bool {
    is_admin(role) || group.visibility == Visibility::Public
}
