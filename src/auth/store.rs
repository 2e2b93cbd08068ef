use async_trait::async_trait;

use crate::db::StoreError;

use super::account::{Account, NewAccountRecord};

/// Persistence the credential resolver and registration path depend on.
///
/// Implementations run each call in its own transaction and report unique
/// violations on the login identifier as [`StoreError::Duplicate`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Exact, case-sensitive match on the login identifier.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn insert(&self, record: NewAccountRecord) -> Result<Account, StoreError>;
}
