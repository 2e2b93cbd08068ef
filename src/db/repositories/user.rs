use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::db::error::StoreResult;
use crate::entities::{prelude::*, users};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, name: &str, email: &str) -> StoreResult<users::Model> {
        let txn = self.conn.begin().await?;

        let model = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<Option<users::Model>> {
        Ok(Users::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<users::Model>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn list(&self) -> StoreResult<Vec<users::Model>> {
        Ok(Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Only the name is mutable; `created_at` is never touched after insert.
    pub async fn update_name_by_email(
        &self,
        email: &str,
        name: &str,
    ) -> StoreResult<Option<users::Model>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> StoreResult<bool> {
        let txn = self.conn.begin().await?;
        let result = Users::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
