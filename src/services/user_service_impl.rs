//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::api::types::UserDto;
use crate::db::Store;
use crate::services::user_service::{UserError, UserService};
use crate::validation::{FieldErrors, is_valid_email};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(name: &str, email: &str) -> Result<(), UserError> {
        let mut errors = FieldErrors::default();
        errors.require("name", name, "Name");
        errors.require("email", email, "Email");
        if !email.trim().is_empty() && !is_valid_email(email) {
            errors.add("email", "Email is not a valid address");
        }

        errors.into_result().map_err(UserError::Validation)
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn create_user(&self, name: &str, email: &str) -> Result<UserDto, UserError> {
        Self::validate(name, email)?;

        let user = self.store.create_user(name, email).await.map_err(|e| match e {
            crate::db::StoreError::Duplicate(_) => {
                UserError::Conflict(format!("Email already registered: {email}"))
            }
            other => other.into(),
        })?;

        info!(user_id = user.id, "Created user");
        Ok(UserDto::from(user))
    }

    async fn get_user(&self, id: i32) -> Result<UserDto, UserError> {
        self.store
            .get_user(id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<UserDto, UserError> {
        self.store
            .get_user_by_email(email)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<UserDto>, UserError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn update_user_by_email(&self, email: &str, name: &str) -> Result<UserDto, UserError> {
        let mut errors = FieldErrors::default();
        errors.require("name", name, "Name");
        errors.into_result().map_err(UserError::Validation)?;

        self.store
            .update_user_name_by_email(email, name)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn delete_user(&self, id: i32) -> Result<(), UserError> {
        if !self.store.delete_user(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }

        info!(user_id = id, "Deleted user");
        Ok(())
    }
}
