//! Authentication and authorization
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated user context (tenant-scoped)
//! - [`require_auth`] - authentication middleware
//! - [`require_permission`] - permission-check middleware
//! - [`password`] - Argon2 password hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_permission};
