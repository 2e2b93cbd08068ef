use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::auth::{Account, NewAccountRecord};
use crate::db::error::StoreResult;
use crate::entities::{prelude::*, user_info};

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Exact match on the login identifier; no case folding or trimming.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let txn = self.conn.begin().await?;

        let account = UserInfo::find()
            .filter(user_info::Column::Email.eq(email))
            .one(&txn)
            .await?;

        txn.commit().await?;
        Ok(account.map(Account::from))
    }

    /// Inserts a new account. A taken email surfaces as `StoreError::Duplicate`
    /// and the transaction is rolled back.
    pub async fn insert(&self, record: NewAccountRecord) -> StoreResult<Account> {
        let txn = self.conn.begin().await?;

        let model = user_info::ActiveModel {
            name: Set(record.name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            roles: Set(record.roles),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(Account::from(model))
    }

    /// Replaces the role list. Returns `None` when no account has that email.
    pub async fn update_roles(&self, email: &str, roles: &str) -> StoreResult<Option<Account>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = UserInfo::find()
            .filter(user_info::Column::Email.eq(email))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: user_info::ActiveModel = existing.into();
        active.roles = Set(roles.to_string());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(Account::from(updated)))
    }

    pub async fn list(&self) -> StoreResult<Vec<Account>> {
        let accounts = UserInfo::find()
            .order_by_asc(user_info::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(accounts.into_iter().map(Account::from).collect())
    }

    pub async fn count_by_email(&self, email: &str) -> StoreResult<u64> {
        let count = UserInfo::find()
            .filter(user_info::Column::Email.eq(email))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
