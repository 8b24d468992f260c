//! Security audit logging.
//!
//! Authentication and authorization outcomes are logged as structured
//! events at INFO level under the `audit` target, so they can be filtered
//! and routed separately from application logs.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Audit events emitted by the auth gate and the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    LoginSuccess {
        user_id: Uuid,
        email: String,
    },

    LoginFailure {
        email: String,
        reason: String,
    },

    RegistrationSuccess {
        user_id: Uuid,
        email: String,
        role: String,
    },

    RoleChanged {
        admin_id: Uuid,
        user_id: Uuid,
        role: String,
    },

    PasswordReset {
        admin_id: Uuid,
        user_id: Uuid,
    },

    /// Authenticated actor denied by policy
    AccessDenied {
        user_id: Uuid,
        email: String,
        resource: String,
    },

    /// Token rejected before an identity could be resolved
    InvalidToken {
        reason: String,
    },
}

/// Log an audit event as a single JSON line under the `audit` target.
pub fn audit_log(event: &AuditEvent) {
    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"failed to serialize audit event: {e}\"}}"));
    info!(target: "audit", event = %event_json, "audit event");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_type() {
        let event = AuditEvent::LoginFailure {
            email: "a@x.com".to_string(),
            reason: "wrong password".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "login_failure");
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn access_denied_carries_resource() {
        let event = AuditEvent::AccessDenied {
            user_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            resource: "group:create".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "access_denied");
        assert_eq!(json["resource"], "group:create");
    }
}
