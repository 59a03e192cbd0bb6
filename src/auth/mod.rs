//! Authentication: token issuance, bearer verification, password hashing

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtService};
pub use middleware::{extract_token, jwt_auth_middleware, verify, Principal};
pub use password::PasswordHasher;

use thiserror::Error;

/// Why a request failed authentication.
///
/// Both variants render identically to the client; the distinction is kept
/// for logs and for callers that need to tell "no token" from "bad token".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header, no token after the scheme, or the
    /// client-side placeholder `"null"`.
    #[error("missing credential")]
    MissingCredential,

    /// Bad signature, malformed or expired token, wrong scheme, or a
    /// login whose identifier/secret did not match.
    #[error("invalid credential")]
    InvalidCredential,
}
