use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Default)]
struct UserTable {
    by_email: HashMap<String, User>,
    // Total accounts ever created; ids are derived from it and never reused.
    created: u64,
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(UserTable::default())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;

        if storage.by_email.contains_key(&new_user.email) {
            warn!(email = %new_user.email, "Email already present in storage");
            return Err(DomainError::AlreadyExists.into());
        }

        storage.created += 1;
        let user = User {
            id: format!("user_{}", storage.created),
            email: new_user.email,
            full_name: new_user.full_name,
            phone: new_user.phone,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: Utc::now(),
        };
        storage.by_email.insert(user.email.clone(), user.clone());

        debug!(
            user_id = %user.id,
            email = %user.email,
            "User saved to memory storage"
        );
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.by_email.get(email).cloned();
        match &user {
            Some(u) => {
                debug!(
                    user_id = %u.id,
                    email = %u.email,
                    "User found in storage"
                );
            }
            None => {
                trace!(email = email, "User not found in storage");
            }
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email, is_active = is_active))]
    async fn set_active(&self, email: &str, is_active: bool) -> Result<()> {
        let mut storage = self.storage.write().await;
        let user = storage
            .by_email
            .get_mut(email)
            .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", email)))?;
        user.is_active = is_active;
        debug!(user_id = %user.id, is_active = is_active, "User active flag updated");
        Ok(())
    }
}
