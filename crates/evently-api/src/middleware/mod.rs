//! HTTP middleware that is not authentication (that lives in
//! [`crate::auth::middleware`]).

pub mod security_headers;

pub use security_headers::security_headers_middleware;
