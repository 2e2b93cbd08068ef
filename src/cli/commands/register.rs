//! Register command handler

use anyhow::Context;
use std::io::BufRead;

use crate::auth::NewAccount;
use crate::config::Config;
use crate::services::{AuthError, Registration};
use crate::state::SharedState;

pub async fn cmd_register(
    config: &Config,
    name: &str,
    email: &str,
    roles: Option<String>,
) -> anyhow::Result<()> {
    eprintln!("Password for {email} (read from stdin):");
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let password = password.trim_end_matches(['\r', '\n']).to_string();

    let state = SharedState::new(config.clone()).await?;
    let registration =
        register_account(&state, NewAccount::new(name, email, password, roles)).await?;

    println!("{} (id {})", registration.message, registration.id);
    Ok(())
}

/// Rejected registrations are errors so the process exits non-zero.
async fn register_account(
    state: &SharedState,
    account: NewAccount,
) -> anyhow::Result<Registration> {
    match state.auth_service.register(account).await {
        Ok(registration) => Ok(registration),
        Err(AuthError::Validation(errors)) => Err(anyhow::anyhow!("Invalid account: {errors}")),
        Err(AuthError::Conflict(email)) => Err(anyhow::anyhow!(
            "An account with email {email} already exists"
        )),
        Err(e) => Err(e.into()),
    }
}
