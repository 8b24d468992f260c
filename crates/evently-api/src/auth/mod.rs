//! Authentication: token issuance and verification, password hashing, and
//! the request gate that turns a bearer token into an identity.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{issue_token, verify_token, Claims, JwtConfig, JwtError};
pub use middleware::{
    auth_middleware, optional_auth_middleware, require_admin, AuthError, AuthenticatedUser,
};
pub use password::{hash_password, verify_password, PasswordError};
