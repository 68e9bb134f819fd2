use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, USERNAME_MAX_LENGTH};
use crate::error::DomainError;

/// User entity - represents an account in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user registered at `now`.
    pub fn new(account: NewAccount, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        self.username = changes.username;
        self.email = changes.email;
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.updated_at = now;
    }
}

impl Identifiable for User {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Registration data. The password is plain text and never stored.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username)?;
        validate_email(&self.email)
    }
}

/// Usernames: 1..=150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LENGTH || !valid_chars {
        return Err(DomainError::Validation(format!(
            "Username must be 1-{USERNAME_MAX_LENGTH} letters, digits or @/./+/-/_"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::Validation("Invalid email address".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("anna.k+blog@home").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("@b.c").is_err());
        assert!(validate_email("plain").is_err());
    }
}
