use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::account::Account;

/// Separator between tokens of an account's role list.
pub const ROLE_DELIMITER: char = ',';

/// A single granted permission, kept exactly as stored (e.g. `ROLE_ADMIN`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The credential view an authentication step consumes.
pub trait UserDetails {
    fn username(&self) -> &str;

    /// Encoded hash; verification is done by a [`super::PasswordEncoder`].
    fn password_hash(&self) -> &str;

    fn authorities(&self) -> &[Authority];

    fn is_account_non_expired(&self) -> bool {
        true
    }

    fn is_account_non_locked(&self) -> bool {
        true
    }

    fn is_credentials_non_expired(&self) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Snapshot of one [`Account`] taken at resolution time.
///
/// Owns its own copy of the account, so later changes to the source record
/// are not visible through a principal that was already issued.
#[derive(Clone)]
pub struct Principal {
    username: String,
    password_hash: String,
    authorities: Vec<Authority>,
    account: Arc<Account>,
}

impl Principal {
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            username: account.email.clone(),
            password_hash: account.password_hash.clone(),
            authorities: parse_authorities(&account.roles),
            account: Arc::new(account.clone()),
        }
    }

    /// Read-only back-reference to the record this principal was built from.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == authority)
    }
}

impl UserDetails for Principal {
    fn username(&self) -> &str {
        &self.username
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn authorities(&self) -> &[Authority] {
        &self.authorities
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("authorities", &self.authorities)
            .finish_non_exhaustive()
    }
}

/// One authority per comma-separated token, verbatim. An empty list yields
/// no authorities.
#[must_use]
pub fn parse_authorities(roles: &str) -> Vec<Authority> {
    if roles.is_empty() {
        return Vec::new();
    }

    roles.split(ROLE_DELIMITER).map(Authority::new).collect()
}

/// Rejects role lists that would produce empty or whitespace-bearing tokens.
pub fn validate_role_list(roles: &str) -> Result<(), String> {
    if roles.is_empty() {
        return Ok(());
    }

    for (index, token) in roles.split(ROLE_DELIMITER).enumerate() {
        if token.is_empty() {
            return Err(format!("Role #{} is empty", index + 1));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(format!("Role '{token}' contains whitespace"));
        }
    }

    Ok(())
}
