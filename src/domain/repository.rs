use crate::domain::esim::Activation;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ActivationRepository: Send + Sync {
    async fn save(&self, activation: Activation) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Activation>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account keyed by email, assigning the next sequential
    /// id. The uniqueness check and the insert happen under one critical
    /// section; a taken email yields `DomainError::AlreadyExists`.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn set_active(&self, email: &str, is_active: bool) -> Result<()>;
}
