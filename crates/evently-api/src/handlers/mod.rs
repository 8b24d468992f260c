//! HTTP handlers. These translate between the wire and the services:
//! extract, validate, delegate, wrap in the response envelope.

pub mod events;
pub mod groups;
pub mod health;
pub mod users;
