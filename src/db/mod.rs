use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::auth::{Account, AccountStore, NewAccountRecord};
use crate::entities::{customers, users};

mod error;
pub mod migrator;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use repositories::student::{StudentDetailInput, StudentInput, StudentWithDetail};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory database sees its own empty
        // database, so keep exactly one.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn customer_repo(&self) -> repositories::customer::CustomerRepository {
        repositories::customer::CustomerRepository::new(self.conn.clone())
    }

    fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    // Accounts

    pub async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.account_repo().find_by_email(email).await
    }

    pub async fn insert_account(&self, record: NewAccountRecord) -> StoreResult<Account> {
        self.account_repo().insert(record).await
    }

    pub async fn update_account_roles(
        &self,
        email: &str,
        roles: &str,
    ) -> StoreResult<Option<Account>> {
        self.account_repo().update_roles(email, roles).await
    }

    pub async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        self.account_repo().list().await
    }

    pub async fn count_accounts_with_email(&self, email: &str) -> StoreResult<u64> {
        self.account_repo().count_by_email(email).await
    }

    // Users

    pub async fn create_user(&self, name: &str, email: &str) -> StoreResult<users::Model> {
        self.user_repo().create(name, email).await
    }

    pub async fn get_user(&self, id: i32) -> StoreResult<Option<users::Model>> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> StoreResult<Vec<users::Model>> {
        self.user_repo().list().await
    }

    pub async fn update_user_name_by_email(
        &self,
        email: &str,
        name: &str,
    ) -> StoreResult<Option<users::Model>> {
        self.user_repo().update_name_by_email(email, name).await
    }

    pub async fn delete_user(&self, id: i32) -> StoreResult<bool> {
        self.user_repo().delete(id).await
    }

    // Customers

    pub async fn create_customer(
        &self,
        customer_id: &str,
        customer_name: &str,
    ) -> StoreResult<customers::Model> {
        self.customer_repo().create(customer_id, customer_name).await
    }

    pub async fn get_customer(&self, id: i32) -> StoreResult<Option<customers::Model>> {
        self.customer_repo().get(id).await
    }

    pub async fn get_customer_by_code(
        &self,
        customer_id: &str,
    ) -> StoreResult<Option<customers::Model>> {
        self.customer_repo().get_by_customer_id(customer_id).await
    }

    pub async fn search_customers_by_name(
        &self,
        fragment: &str,
    ) -> StoreResult<Vec<customers::Model>> {
        self.customer_repo().search_by_name(fragment).await
    }

    pub async fn list_customers(&self) -> StoreResult<Vec<customers::Model>> {
        self.customer_repo().list().await
    }

    pub async fn delete_customer(&self, id: i32) -> StoreResult<bool> {
        self.customer_repo().delete(id).await
    }

    // Students

    pub async fn list_students(&self) -> StoreResult<Vec<StudentWithDetail>> {
        self.student_repo().list().await
    }

    pub async fn get_student(&self, id: i32) -> StoreResult<Option<StudentWithDetail>> {
        self.student_repo().get(id).await
    }

    pub async fn get_student_by_number(
        &self,
        student_number: &str,
    ) -> StoreResult<Option<StudentWithDetail>> {
        self.student_repo().get_by_number(student_number).await
    }

    pub async fn create_student(&self, input: StudentInput) -> StoreResult<StudentWithDetail> {
        self.student_repo().create(input).await
    }

    pub async fn update_student(
        &self,
        id: i32,
        input: StudentInput,
    ) -> StoreResult<Option<StudentWithDetail>> {
        self.student_repo().update(id, input).await
    }

    pub async fn delete_student(&self, id: i32) -> StoreResult<bool> {
        self.student_repo().delete(id).await
    }
}

#[async_trait]
impl AccountStore for Store {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.find_account_by_email(email).await
    }

    async fn insert(&self, record: NewAccountRecord) -> Result<Account, StoreError> {
        self.insert_account(record).await
    }
}
