use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::errors::ValidationError;
use crate::{Error, Result};

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Input for the user store. `email` is already normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Email and password pair submitted at sign-up or sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Emails are compared case-insensitively and stored lower-cased.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Rules applied when creating an account.
    pub fn validate_for_sign_up(&self) -> Result<()> {
        let email = self.normalized_email();
        if email.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "email".to_string(),
            )));
        }
        if !email.contains('@') {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not an email address",
                email
            ))));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ))));
        }
        Ok(())
    }
}

/// The authenticated caller. Passed explicitly to every recipe operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity::new(user.id.clone(), user.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_rules() {
        assert!(Credentials::new("cook@example.com", "secret").validate_for_sign_up().is_ok());
        assert!(Credentials::new("cook.example.com", "secret").validate_for_sign_up().is_err());
        assert!(Credentials::new("cook@example.com", "12345").validate_for_sign_up().is_err());
        assert!(Credentials::new("  ", "secret123").validate_for_sign_up().is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        let creds = Credentials::new("  Cook@Example.COM ", "secret");
        assert_eq!(creds.normalized_email(), "cook@example.com");
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "a@b.c");
    }
}
