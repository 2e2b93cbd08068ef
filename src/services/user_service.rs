//! Domain service for the user directory.

use thiserror::Error;

use crate::api::types::UserDto;
use crate::db::StoreError;
use crate::validation::FieldErrors;

/// Errors specific to user directory operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(detail) => Self::Conflict(detail),
            StoreError::Db(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for users.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Conflict`] if the email is already taken.
    async fn create_user(&self, name: &str, email: &str) -> Result<UserDto, UserError>;

    async fn get_user(&self, id: i32) -> Result<UserDto, UserError>;

    async fn get_user_by_email(&self, email: &str) -> Result<UserDto, UserError>;

    async fn list_users(&self) -> Result<Vec<UserDto>, UserError>;

    /// Renames the user with `email`. The email itself is immutable.
    async fn update_user_by_email(&self, email: &str, name: &str) -> Result<UserDto, UserError>;

    async fn delete_user(&self, id: i32) -> Result<(), UserError>;
}
