use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Email already registered")]
    AlreadyExists,
    #[error("Weak credential: {0}")]
    WeakCredential(String),
    #[error("Validation error: {0}")]
    Validation(String),
    // Unknown email and wrong password share this variant.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is disabled")]
    AccountDisabled,
    // Malformed, badly signed and expired tokens share this variant.
    #[error("Invalid token")]
    InvalidToken,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
