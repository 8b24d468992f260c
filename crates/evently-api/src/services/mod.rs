//! Business rules. Each service owns one resource: it validates input,
//! consults the authorization policy, and talks to its repository. HTTP
//! shapes stay in the handlers; storage details stay behind the repository
//! traits.

pub mod events;
pub mod groups;
pub mod users;

pub use events::EventService;
pub use groups::GroupService;
pub use users::UserService;
