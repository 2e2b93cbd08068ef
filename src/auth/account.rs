use std::fmt;

use crate::entities::user_info;
use crate::validation::{FieldErrors, is_valid_email};

use super::principal::validate_role_list;

/// A persisted login account.
///
/// `password_hash` is always an encoded hash, never plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

impl From<user_info::Model> for Account {
    fn from(model: user_info::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            roles: model.roles,
        }
    }
}

/// Registration input. Holds the plaintext secret until it is hashed.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    /// `None` falls back to the configured default roles.
    pub roles: Option<String>,
    password: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        roles: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            roles,
            password: password.into(),
        }
    }

    /// Checks required fields and the role list shape. Nothing is persisted
    /// when this fails.
    pub fn validate(&self, min_password_length: usize) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Email is not a valid address");
        }

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < min_password_length {
            errors.add(
                "password",
                format!("Password must be at least {min_password_length} characters"),
            );
        }

        if let Some(roles) = &self.roles
            && let Err(msg) = validate_role_list(roles)
        {
            errors.add("roles", msg);
        }

        errors.into_result()
    }

    /// Splits off the plaintext so it can be moved into the hasher.
    pub(crate) fn into_parts(self) -> (String, String, Option<String>, String) {
        (self.name, self.email, self.roles, self.password)
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the store persists: the hash has already replaced the plaintext.
#[derive(Clone)]
pub struct NewAccountRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: String,
}

impl fmt::Debug for NewAccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccountRecord")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let account = Account {
            id: 1,
            name: "Spring".to_string(),
            email: "spring@a.com".to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$ZGlnZXN0".to_string(),
            roles: "ROLE_USER".to_string(),
        };
        let rendered = format!("{account:?}");
        assert!(!rendered.contains("argon2id"));
        assert!(rendered.contains("<redacted>"));

        let new_account = NewAccount::new("Spring", "spring@a.com", "hunter22", None);
        assert!(!format!("{new_account:?}").contains("hunter22"));
    }

    #[test]
    fn test_validate_collects_field_errors() {
        let account = NewAccount::new("", "not-an-email", "ab", Some("ROLE_A,,ROLE_B".into()));
        let errors = account.validate(4).unwrap_err();

        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("roles").is_some());
    }

    #[test]
    fn test_validate_accepts_well_formed_account() {
        let account = NewAccount::new(
            "Admin",
            "admin@a.com",
            "pwd1234",
            Some("ROLE_ADMIN,ROLE_USER".into()),
        );
        assert!(account.validate(4).is_ok());

        let no_roles = NewAccount::new("User", "user@a.com", "pwd1234", Some(String::new()));
        assert!(no_roles.validate(4).is_ok());
    }
}
