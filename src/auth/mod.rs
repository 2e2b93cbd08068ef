//! Credential resolution: bridges persisted accounts to the shape the
//! request pipeline authenticates and authorizes against.
//!
//! - [`Account`] is the persisted login record.
//! - [`Principal`] is the per-request snapshot built from one account.
//! - [`PasswordEncoder`] hashes and verifies secrets.
//! - [`AccountStore`] is what the resolver reads from and registration writes to.

mod account;
mod password;
mod principal;
mod store;

pub use account::{Account, NewAccount, NewAccountRecord};
pub use password::{Argon2PasswordEncoder, PasswordEncoder};
pub use principal::{
    Authority, Principal, ROLE_DELIMITER, UserDetails, parse_authorities, validate_role_list,
};
pub use store::AccountStore;

/// Authority required for destructive directory operations.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
