//! Default implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, warn};

use crate::auth::{
    AccountStore, NewAccount, NewAccountRecord, PasswordEncoder, Principal, UserDetails,
};
use crate::config::SecurityConfig;
use crate::constants::metrics::{LOGIN_TOTAL, REGISTRATIONS_TOTAL};
use crate::db::StoreError;
use crate::services::auth_service::{AuthError, AuthService, Registration};

pub struct DefaultAuthService {
    accounts: Arc<dyn AccountStore>,
    encoder: Arc<dyn PasswordEncoder>,
    min_password_length: usize,
    default_roles: String,
}

impl DefaultAuthService {
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        encoder: Arc<dyn PasswordEncoder>,
        security: &SecurityConfig,
    ) -> Self {
        Self {
            accounts,
            encoder,
            min_password_length: security.min_password_length,
            default_roles: security.default_roles.clone(),
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuthService {
    async fn resolve_principal(&self, email: &str) -> Result<Principal, AuthError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        debug!(user_id = account.id, "Resolved principal");
        Ok(Principal::from_account(&account))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = match self.resolve_principal(email).await {
            Ok(principal) => principal,
            Err(e) => {
                if matches!(e, AuthError::NotFound(_)) {
                    metrics::counter!(LOGIN_TOTAL, "outcome" => "unknown_user")
                        .increment(1);
                }
                return Err(e);
            }
        };

        let encoder = self.encoder.clone();
        let password = password.to_string();
        let stored_hash = principal.password_hash().to_string();

        // Argon2 is CPU-bound; keep it off the async workers.
        let verified = task::spawn_blocking(move || encoder.matches(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        if !verified {
            metrics::counter!(LOGIN_TOTAL, "outcome" => "bad_password").increment(1);
            warn!("Failed login attempt for {email}");
            return Err(AuthError::InvalidCredentials);
        }

        metrics::counter!(LOGIN_TOTAL, "outcome" => "success").increment(1);
        Ok(principal)
    }

    async fn register(&self, account: NewAccount) -> Result<Registration, AuthError> {
        if let Err(errors) = account.validate(self.min_password_length) {
            metrics::counter!(REGISTRATIONS_TOTAL, "outcome" => "invalid").increment(1);
            return Err(AuthError::Validation(errors));
        }

        let (name, email, roles, password) = account.into_parts();
        let roles = roles.unwrap_or_else(|| self.default_roles.clone());

        let encoder = self.encoder.clone();
        let password_hash = task::spawn_blocking(move || encoder.encode(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let record = NewAccountRecord {
            name,
            email: email.clone(),
            password_hash,
            roles,
        };

        let saved = match self.accounts.insert(record).await {
            Ok(saved) => saved,
            Err(StoreError::Duplicate(_)) => {
                metrics::counter!(REGISTRATIONS_TOTAL, "outcome" => "conflict")
                    .increment(1);
                return Err(AuthError::Conflict(email));
            }
            Err(e) => return Err(e.into()),
        };

        metrics::counter!(REGISTRATIONS_TOTAL, "outcome" => "created").increment(1);
        info!(user_id = saved.id, "Registered account {}", saved.email);

        Ok(Registration {
            id: saved.id,
            message: format!("{} user added", saved.name),
            name: saved.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Account, Argon2PasswordEncoder};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Keyed by email, mirroring the unique index.
    #[derive(Default)]
    struct MemoryAccounts {
        rows: Mutex<HashMap<String, Account>>,
    }

    #[async_trait]
    impl AccountStore for MemoryAccounts {
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
            Ok(self.rows.lock().await.get(email).cloned())
        }

        async fn insert(&self, record: NewAccountRecord) -> Result<Account, StoreError> {
            let mut rows = self.rows.lock().await;
            if rows.contains_key(&record.email) {
                return Err(StoreError::Duplicate("user_info.email".to_string()));
            }

            let account = Account {
                id: i32::try_from(rows.len()).unwrap_or(i32::MAX) + 1,
                name: record.name,
                email: record.email.clone(),
                password_hash: record.password_hash,
                roles: record.roles,
            };
            rows.insert(record.email, account.clone());
            Ok(account)
        }
    }

    fn security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 256,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        }
    }

    fn service() -> (DefaultAuthService, Arc<MemoryAccounts>, Arc<Argon2PasswordEncoder>) {
        let accounts = Arc::new(MemoryAccounts::default());
        let encoder = Arc::new(Argon2PasswordEncoder::new(&security()).unwrap());
        let service = DefaultAuthService::new(accounts.clone(), encoder.clone(), &security());
        (service, accounts, encoder)
    }

    #[tokio::test]
    async fn test_register_then_resolve_verifies_original_secret() {
        let (service, accounts, encoder) = service();

        let registration = service
            .register(NewAccount::new(
                "Admin",
                "admin@a.com",
                "pwd1234",
                Some("ROLE_ADMIN,ROLE_USER".into()),
            ))
            .await
            .unwrap();
        assert_eq!(registration.name, "Admin");
        assert_eq!(registration.message, "Admin user added");

        let stored = accounts.rows.lock().await.get("admin@a.com").cloned().unwrap();
        assert_ne!(stored.password_hash, "pwd1234");

        let principal = service.resolve_principal("admin@a.com").await.unwrap();
        assert!(encoder.matches("pwd1234", principal.password_hash()));
        assert!(!encoder.matches("pwd12345", principal.password_hash()));
        assert!(principal.has_authority("ROLE_ADMIN"));
        assert!(principal.has_authority("ROLE_USER"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_identifier_is_not_found() {
        let (service, _, _) = service();

        let err = service.resolve_principal("nobody@x.com").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(ref id) if id == "nobody@x.com"));
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let (service, _, _) = service();
        service
            .register(NewAccount::new("Spring", "spring@a.com", "pwd1234", None))
            .await
            .unwrap();

        assert!(service.resolve_principal("Spring@a.com").await.is_err());
        assert!(service.resolve_principal(" spring@a.com").await.is_err());
        assert!(service.resolve_principal("spring@a.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (service, accounts, _) = service();

        service
            .register(NewAccount::new("First", "dup@a.com", "pwd1234", None))
            .await
            .unwrap();
        let err = service
            .register(NewAccount::new("Second", "dup@a.com", "other123", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Conflict(ref id) if id == "dup@a.com"));
        let rows = accounts.rows.lock().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows["dup@a.com"].name, "First");
    }

    #[tokio::test]
    async fn test_invalid_registration_persists_nothing() {
        let (service, accounts, _) = service();

        let err = service
            .register(NewAccount::new("Bad", "bad@a.com", "pwd1234", Some("A,,B".into())))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation(ref e) if e.get("roles").is_some()));
        assert!(accounts.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_default_roles_applied_when_absent() {
        let (service, _, _) = service();
        service
            .register(NewAccount::new("User", "user@a.com", "pwd1234", None))
            .await
            .unwrap();

        let principal = service.resolve_principal("user@a.com").await.unwrap();
        assert_eq!(principal.authorities().len(), 1);
        assert!(principal.has_authority("ROLE_USER"));
    }

    #[tokio::test]
    async fn test_authenticate_distinguishes_outcomes() {
        let (service, _, _) = service();
        service
            .register(NewAccount::new("User", "user@a.com", "pwd1234", None))
            .await
            .unwrap();

        assert!(service.authenticate("user@a.com", "pwd1234").await.is_ok());
        assert!(matches!(
            service.authenticate("user@a.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate("ghost@a.com", "pwd1234").await,
            Err(AuthError::NotFound(_))
        ));
    }
}
