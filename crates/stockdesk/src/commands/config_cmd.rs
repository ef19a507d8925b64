//! Config subcommand handlers. None of these need a backend connection.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const SETTABLE_KEYS: &str = "api_url, token_env, username, ca_cert, insecure, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with stored tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

/// TOML-looking rendering for `config show` in table mode.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);
    let _ = writeln!(out, "search_debounce_ms = {}", cfg.defaults.search_debounce_ms);

    for name in cfg.profile_names() {
        let p = &cfg.profiles[&name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            let url = stockdesk_config::parse_api_url(&value)?;
            profile.api_url = url.to_string();
        }
        "token_env" | "token-env" => profile.token_env = Some(value),
        "username" => profile.username = Some(value),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("stockdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            if cfg.profiles.contains_key(&profile_name)
                && !Confirm::new()
                    .with_prompt(format!("Profile '{profile_name}' exists. Overwrite?"))
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                return Ok(());
            }

            // 2. API URL
            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("http://localhost:3000/api/".into())
                .validate_with(|raw: &String| {
                    stockdesk_config::parse_api_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;
            let api_url = stockdesk_config::parse_api_url(&api_url)?;

            // 3. Username remembered for `login`
            let username: String = Input::new()
                .with_prompt("Username (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            // 4. TLS
            let insecure = api_url.scheme() == "https"
                && Confirm::new()
                    .with_prompt("Accept self-signed certificates?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;

            let profile = Profile {
                api_url: api_url.to_string(),
                username: Some(username.trim().to_owned()).filter(|u| !u.is_empty()),
                insecure: insecure.then_some(true),
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: stockdesk login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }

            config::save_config(&cfg)?;
            output::print_status(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let names = cfg.profile_names();
            if names.is_empty() {
                eprintln!("No profiles configured. Run: stockdesk config init");
            } else {
                let out = names
                    .iter()
                    .map(|name| {
                        if name == default {
                            format!("{name} *")
                        } else {
                            name.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_masked() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                api_url: "https://stock.example.com/api/".into(),
                token: Some("secret-token".into()),
                ..Profile::default()
            },
        );
        let shown = format_config(&redacted(&cfg));
        assert!(shown.contains("[profiles.prod]"));
        assert!(shown.contains("token = \"****\""));
        assert!(!shown.contains("secret-token"));
    }

    #[test]
    fn unknown_key_lists_valid_ones() {
        let mut profile = Profile::default();
        let err = set_key(&mut profile, "controller", "x".into()).unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn api_url_is_normalised() {
        let mut profile = Profile::default();
        set_key(&mut profile, "api_url", "https://stock.example.com/api".into()).unwrap();
        assert_eq!(profile.api_url, "https://stock.example.com/api/");
        set_key(&mut profile, "timeout", "15".into()).unwrap();
        assert_eq!(profile.timeout, Some(15));
    }
}
