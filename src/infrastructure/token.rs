//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the subject (the account email) and an
//! expiry. Nothing is stored server-side: a token is valid exactly while its
//! signature checks out and the injected clock is before its expiry.

use crate::domain::error::DomainError;
use crate::infrastructure::clock::Clock;
use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// A freshly signed token together with its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    /// Keys are derived once here and reused for every request.
    pub fn new(secret: &str, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
            clock,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    #[instrument(skip(self), fields(ttl_secs = ttl.num_seconds()))]
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, DomainError> {
        if ttl <= Duration::zero() {
            return Err(DomainError::Validation(
                "Token lifetime must be positive".to_string(),
            ));
        }

        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| {
                error!(error = %e, "Failed to sign token");
                DomainError::Internal(format!("Failed to generate token: {}", e))
            })?;

        debug!(exp = claims.exp, "Token issued");
        Ok(IssuedToken {
            access_token,
            expires_in: ttl.num_seconds(),
        })
    }

    /// Returns the subject of a valid token. Every failure, whatever its
    /// cause, comes back as `DomainError::InvalidToken`.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<String, DomainError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(reason = %e, "Token rejected");
                DomainError::InvalidToken
            })?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            debug!(exp = claims.exp, "Token rejected: expired");
            return Err(DomainError::InvalidToken);
        }
        if claims.sub.is_empty() {
            debug!("Token rejected: empty subject");
            return Err(DomainError::InvalidToken);
        }

        Ok(claims.sub)
    }

    /// Issues a new token with the default lifetime. Earlier tokens for the
    /// same subject stay valid until they expire.
    pub fn refresh(&self, subject: &str) -> Result<IssuedToken, DomainError> {
        self.issue(subject, self.default_ttl)
    }
}
