//! Domain service for credential resolution and account registration.
//!
//! Resolution turns a login identifier into a [`Principal`]; registration
//! hashes a new secret and persists the account.

use serde::Serialize;
use thiserror::Error;

use crate::auth::{NewAccount, Principal};
use crate::db::StoreError;
use crate::validation::FieldErrors;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account has this login identifier.
    #[error("User not found: {0}")]
    NotFound(String),

    /// The login identifier is already registered.
    #[error("Account already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The account exists but the secret did not verify.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authority: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(detail) => Self::Conflict(detail),
            StoreError::Db(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Confirmation returned after a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: i32,
    pub name: String,
    pub message: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Looks up the account for `email` and adapts it into a fresh principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotFound`] carrying the attempted identifier if no
    /// account matches.
    async fn resolve_principal(&self, email: &str) -> Result<Principal, AuthError>;

    /// Resolves the principal and verifies `password` against its stored hash.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotFound`] for an unknown identifier,
    /// [`AuthError::InvalidCredentials`] for a wrong secret.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// Hashes the plaintext secret and persists the account.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] before anything is written,
    /// [`AuthError::Conflict`] if the email is taken.
    async fn register(&self, account: NewAccount) -> Result<Registration, AuthError>;
}
