//! Whois command handler

use crate::auth::UserDetails;
use crate::config::Config;
use crate::services::AuthError;
use crate::state::SharedState;

pub async fn cmd_whois(config: &Config, email: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let principal = match state.auth_service.resolve_principal(email).await {
        Ok(principal) => principal,
        Err(AuthError::NotFound(email)) => {
            println!("No account found for {email}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let account = principal.account();
    println!("{} <{}>", account.name, principal.username());
    println!("{:-<50}", "");
    println!("  ID: {}", account.id);

    if principal.authorities().is_empty() {
        println!("  Authorities: (none)");
    } else {
        println!("  Authorities:");
        for authority in principal.authorities() {
            println!("    - {authority}");
        }
    }

    println!(
        "  Enabled: {} | Locked: {} | Expired: {}",
        principal.is_enabled(),
        !principal.is_account_non_locked(),
        !principal.is_account_non_expired()
    );

    Ok(())
}
