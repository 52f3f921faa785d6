use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User, UserProfile};
use crate::domain::validation::validate_password_strength;
use crate::infrastructure::security::{hash_password_blocking, verify_password_blocking};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

/// Account-of-record operations on top of a [`UserRepository`]: password
/// hashing on create and constant-shape credential checks on login.
pub struct CredentialStore<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> CredentialStore<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, full_name, phone, raw_password), fields(email = %email))]
    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        phone: &str,
        raw_password: &str,
    ) -> Result<UserProfile> {
        trace!("Creating account");

        // Fast path; the repository repeats the check under its write lock.
        if self.repository.find_user_by_email(email).await?.is_some() {
            warn!(email = %email, "User already exists");
            return Err(DomainError::AlreadyExists.into());
        }

        validate_password_strength(raw_password).inspect_err(|_| {
            warn!(email = %email, "Password below minimum length");
        })?;

        let password_hash = hash_password_blocking(raw_password.to_string())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(e.to_string())
            })?;

        let user = self
            .repository
            .create_user(NewUser {
                email: email.to_string(),
                full_name: full_name.to_string(),
                phone: phone.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Account created");
        Ok(user.into())
    }

    #[instrument(skip(self), fields(email = email))]
    pub async fn find_by_email(&self, email: &str) -> Result<UserProfile> {
        self.repository
            .find_user_by_email(email)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| {
                debug!(email = email, "Account lookup missed");
                DomainError::NotFound("User not found".to_string()).into()
            })
    }

    #[instrument(skip(self, raw_password), fields(email = email))]
    pub async fn verify_credentials(&self, email: &str, raw_password: &str) -> Result<User> {
        let user = self
            .repository
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(email = email, "Unknown email during credential check");
                DomainError::InvalidCredentials
            })?;

        let is_valid =
            verify_password_blocking(raw_password.to_string(), user.password_hash.clone())
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to verify password");
                    DomainError::Internal(e.to_string())
                })?;

        if !is_valid {
            warn!(user_id = %user.id, "Wrong password during credential check");
            return Err(DomainError::InvalidCredentials.into());
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Credential check for disabled account");
            return Err(DomainError::AccountDisabled.into());
        }

        debug!(user_id = %user.id, "Credentials verified");
        Ok(user)
    }
}
