//! Core domain types for the Evently backend.
//!
//! This crate holds what every other layer depends on: the application
//! configuration, the document models (users, events, groups), and the pure
//! authorization policy. It is deliberately free of HTTP and storage
//! concerns.

pub mod config;
pub mod model;
pub mod policy;

pub use config::{AppConfig, AuthConfig, ConfigError, HashingConfig, ServerConfig};
pub use model::{
    Event, EventCategory, EventStatus, Group, OwnerSummary, User, UserPublic, UserRole, Visibility,
};
