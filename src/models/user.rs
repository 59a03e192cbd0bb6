//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub condition: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create user request
///
/// Missing fields deserialize to empty strings so they fail validation with a
/// 400 instead of a body-parsing rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default, alias = "identifier")]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default, alias = "secret")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub condition: Option<String>,
    pub color: Option<String>,
}

impl CreateUserRequest {
    /// Trim names and normalize the identifier before validation
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: normalize_identifier(&self.email),
            password: self.password,
            condition: self.condition.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            color: self.color.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }
}

/// Record handed to the store for insertion; the secret is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub condition: Option<String>,
    pub color: Option<String>,
}

/// Create user response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub identifier: String,
    pub user_id: i64,
}

/// Identifiers are compared case-insensitively, without surrounding blanks
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, first_name: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
            condition: Some("  ".to_string()),
            color: None,
        }
    }

    #[test]
    fn test_normalized_lowercases_identifier() {
        let req = request("  A@X.com ", "Jane").normalized();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.condition, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_first_name_fails_validation() {
        let req = request("a@x.com", "   ").normalized();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_malformed_email_fails_validation() {
        let req = request("not-an-email", "Jane").normalized();
        assert!(req.validate().is_err());
    }
}
