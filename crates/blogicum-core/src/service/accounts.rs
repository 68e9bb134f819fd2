use std::sync::Arc;

use uuid::Uuid;

use super::Repositories;
use crate::domain::{NewAccount, ProfileChanges, User, Viewer, validate_email, validate_username};
use crate::error::DomainError;
use crate::ports::{Clock, PasswordService};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration, login and profile editing.
pub struct AccountService {
    repos: Repositories,
    passwords: Arc<dyn PasswordService>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            passwords,
            clock,
        }
    }

    pub async fn register(&self, account: NewAccount) -> Result<User, DomainError> {
        validate_username(&account.username)?;
        validate_email(&account.email)?;
        if account.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        self.ensure_unique(&account.username, &account.email, None)
            .await?;

        let password_hash = self
            .passwords
            .hash(&account.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(account, password_hash, self.clock.now());
        Ok(self.repos.users.save(user).await?)
    }

    /// Check credentials. Unknown usernames and wrong passwords look the same.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Edit the viewer's own account.
    pub async fn update_profile(
        &self,
        viewer: &Viewer,
        changes: ProfileChanges,
    ) -> Result<User, DomainError> {
        let user_id = viewer.require_user()?;
        changes.validate()?;

        let mut user = self.find_by_id(user_id).await?;
        self.ensure_unique(&changes.username, &changes.email, Some(user_id))
            .await?;

        user.apply(changes, self.clock.now());
        Ok(self.repos.users.save(user).await?)
    }

    async fn ensure_unique(
        &self,
        username: &str,
        email: &str,
        current: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let taken_by_other = |user: Option<User>| user.is_some_and(|u| Some(u.id) != current);

        if taken_by_other(self.repos.users.find_by_username(username).await?) {
            return Err(DomainError::Duplicate("Username already taken".to_string()));
        }
        if taken_by_other(self.repos.users.find_by_email(email).await?) {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }
        Ok(())
    }
}
