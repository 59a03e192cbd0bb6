//! Authentication-related models

use serde::{Deserialize, Serialize};

/// Login request
///
/// Older clients post `email`/`password`; both spellings are accepted.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email")]
    pub identifier: String,
    #[serde(default, alias = "password")]
    pub secret: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user_id: i64,
}
