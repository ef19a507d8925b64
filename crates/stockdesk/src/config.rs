//! CLI configuration: thin wrapper around `stockdesk_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --token, --timeout, ...).

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use stockdesk_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use stockdesk_config::{
    ClientState, Config, Profile, config_path, load_config_or_default, load_state, save_config,
    save_state,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the session `ConsoleConfig`: profile values first, then CLI flag
/// overrides, then the persisted theme.
pub fn resolve_console_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(String, ConsoleConfig), CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist unless the URL is given.
        None if global.profile.is_some() && global.api_url.is_none() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => Profile::default(),
    };

    // 1. API URL (flag > env > profile)
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if profile.api_url.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    // 2. TLS and timeout
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut console =
        stockdesk_config::profile_to_console_config(&profile, &profile_name, &config.defaults)?;

    // 3. Token (flag > stored)
    if let Some(ref token) = global.token {
        console.token = Some(SecretString::from(token.clone()));
    }

    // 4. Persisted theme
    console.theme = load_state().theme;

    debug!(
        profile = %profile_name,
        url = %console.api_url,
        has_token = console.token.is_some(),
        "resolved console config"
    );
    Ok((profile_name, console))
}

/// Persist a fresh session token: keyring when available, plaintext in
/// the profile otherwise. The profile is created if needed.
pub fn remember_session(
    profile_name: &str,
    api_url: &str,
    username: &str,
    token: &SecretString,
) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();
    let keyring_ok = match stockdesk_config::store_token(profile_name, token) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "keyring unavailable, storing token in config file");
            false
        }
    };

    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
    if profile.api_url.is_empty() {
        api_url.clone_into(&mut profile.api_url);
    }
    profile.username = Some(username.to_owned());
    profile.token = if keyring_ok {
        None
    } else {
        Some(token.expose_secret().to_owned())
    };
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.to_owned());
    }
    save_config(&cfg)?;
    Ok(())
}

/// Drop every stored copy of the session token for a profile.
pub fn forget_session(profile_name: &str) -> Result<(), CliError> {
    if let Err(e) = stockdesk_config::delete_token(profile_name) {
        debug!(error = %e, "no keyring token removed");
    }
    let mut cfg = load_config_or_default();
    if let Some(profile) = cfg.profiles.get_mut(profile_name) {
        if profile.token.take().is_some() {
            save_config(&cfg)?;
        }
    }
    Ok(())
}
