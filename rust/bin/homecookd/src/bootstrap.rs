//! Bootstrap: first-start checks and the configured SuperAdmin account.
//!
//! When homecookd starts:
//! 1. Verify the config has a JWT secret and a data directory.
//! 2. If `[superadmin]` is configured, make sure that user exists, has a
//!    confirmed email and holds the `SuperAdmin` role.
//!
//! Built-in roles are created by `AccountService::new`.

use account::service::AccountService;
use homecook_core::{ROLE_SUPER_ADMIN, ROLE_USER};
use tracing::info;

use crate::config::{ServerConfig, SuperAdminConfig};

/// Verify server configuration is ready to serve.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("JWT expire_secs must be positive.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if let Some(admin) = &config.superadmin {
        if admin.email.trim().is_empty() || admin.password_hash.is_empty() {
            anyhow::bail!(
                "[superadmin] needs both email and password_hash.\n\
                 Run `homecookd hash-password <password>` to produce a hash."
            );
        }
    }
    Ok(())
}

/// Ensure the configured SuperAdmin exists. Returns the user id.
pub fn ensure_superadmin(
    accounts: &AccountService,
    admin: &SuperAdminConfig,
) -> anyhow::Result<String> {
    let user = match accounts.find_by_email(&admin.email)? {
        Some(user) => {
            if !user.email_confirmed {
                accounts.mark_email_confirmed(&user.id)?;
            }
            info!(user_id = %user.id, "superadmin account already exists");
            user
        }
        None => {
            let user = accounts.create_user(
                admin.email.trim(),
                &admin.full_name,
                &admin.password_hash,
                true,
            )?;
            accounts.grant_role(&user.id, ROLE_USER)?;
            info!(user_id = %user.id, email = %user.email, "created superadmin account");
            user
        }
    };
    accounts.grant_role(&user.id, ROLE_SUPER_ADMIN)?;
    Ok(user.id)
}
