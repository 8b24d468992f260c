//! Storage layer for Evently documents.
//!
//! The service layer talks to three repository traits, one per collection.
//! The traits are the seam where a networked document database would plug
//! in; the crate ships [`MemoryStore`], an in-process backend that provides
//! the one guarantee the deployed system relies on: atomicity of each
//! single-document operation. There are no multi-document transactions.

pub mod error;
pub mod memory;
mod repository;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{EventRepository, GroupRepository, UserRepository};
