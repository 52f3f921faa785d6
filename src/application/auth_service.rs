use crate::application::credential_store::CredentialStore;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, UserProfile};
use crate::domain::validation::{require_non_empty, validate_email};
use crate::infrastructure::token::{IssuedToken, TokenAuthority};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, trace};

pub struct AuthService<R: UserRepository> {
    credentials: CredentialStore<R>,
    tokens: Arc<TokenAuthority>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, tokens: Arc<TokenAuthority>) -> Self {
        Self {
            credentials: CredentialStore::new(user_repository),
            tokens,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: CreateUser) -> Result<UserProfile> {
        trace!("Starting user registration");

        validate_email(&req.email)?;
        require_non_empty("full_name", &req.full_name)?;
        require_non_empty("phone", &req.phone)?;

        let profile = self
            .credentials
            .create(&req.email, &req.full_name, &req.phone, &req.password)
            .await?;

        info!(user_id = %profile.id, email = %profile.email, "User registered successfully");
        Ok(profile)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<IssuedToken> {
        trace!("Starting login");

        let user = self
            .credentials
            .verify_credentials(&req.email, &req.password)
            .await?;
        let token = self.tokens.issue(&user.email, self.tokens.default_ttl())?;

        info!(user_id = %user.id, email = %user.email, "Login successful");
        Ok(token)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, email: &str) -> Result<UserProfile> {
        self.credentials.find_by_email(email).await
    }

    /// Acknowledges a logout. Tokens are stateless, so the presented token
    /// stays valid until it expires.
    #[instrument(skip(self))]
    pub fn logout(&self, email: &str) {
        info!(email = %email, "Logout acknowledged; token remains valid until expiry");
    }

    #[instrument(skip(self))]
    pub fn refresh(&self, email: &str) -> Result<IssuedToken> {
        let token = self.tokens.refresh(email)?;
        info!(email = %email, "Token refreshed");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::error::DomainError;
    use crate::infrastructure::clock::ManualClock;
    use chrono::Duration;

    type Fixture = (
        AuthService<InMemoryUserRepository>,
        Arc<ManualClock>,
        Arc<TokenAuthority>,
    );

    fn service() -> Fixture {
        let clock = Arc::new(ManualClock::default());
        let tokens = Arc::new(TokenAuthority::new(
            "auth-service-test-secret",
            Duration::minutes(30),
            clock.clone(),
        ));
        (
            AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens.clone()),
            clock,
            tokens,
        )
    }

    fn alice() -> CreateUser {
        CreateUser {
            email: "alice@x.com".to_string(),
            password: "password123".to_string(),
            full_name: "Alice".to_string(),
            phone: "+95 9 123 456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let (service, _, _) = service();
        let mut req = alice();
        req.email = "not-an-email".to_string();

        let err = service.register_user(req).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let (service, _, _) = service();
        let mut req = alice();
        req.full_name = " ".to_string();

        assert!(service.register_user(req).await.is_err());
    }

    #[tokio::test]
    async fn test_login_token_authenticates_as_email() {
        let (service, _, tokens) = service();
        service.register_user(alice()).await.unwrap();

        let token = service
            .login(LoginRequest {
                email: "alice@x.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(token.expires_in, 1800);
        assert_eq!(tokens.verify(&token.access_token).unwrap(), "alice@x.com");
        let profile = service.profile("alice@x.com").await.unwrap();
        assert_eq!(profile.id, "user_1");
    }

    #[tokio::test]
    async fn test_logout_does_not_revoke() {
        let (service, clock, tokens) = service();
        service.register_user(alice()).await.unwrap();
        let token = service
            .login(LoginRequest {
                email: "alice@x.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        service.logout("alice@x.com");
        assert!(tokens.verify(&token.access_token).is_ok());

        clock.advance(Duration::minutes(31));
        let err = tokens.verify(&token.access_token).unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken));
    }

    #[tokio::test]
    async fn test_refresh_issues_token_for_same_subject() {
        let (service, _, tokens) = service();
        let token = service.refresh("alice@x.com").unwrap();
        assert_eq!(tokens.verify(&token.access_token).unwrap(), "alice@x.com");
    }
}
