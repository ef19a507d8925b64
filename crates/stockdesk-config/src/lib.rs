//! Shared configuration for the stockdesk console.
//!
//! TOML profiles, session token storage (keyring + env + plaintext),
//! persisted client state, and translation to
//! `stockdesk_core::ConsoleConfig`. The CLI layers its `GlobalOpts`
//! overrides on top.

pub mod state;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use stockdesk_core::api::TlsMode;
use stockdesk_core::{ConsoleConfig, debounce};

pub use state::{ClientState, load_state, save_state, state_path};

/// Environment variable consulted for the session token.
pub const TOKEN_ENV: &str = "STOCKDESK_TOKEN";

const KEYRING_SERVICE: &str = "stockdesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Rows per page for client-paged lists.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet window for interactive search, clamped to 300–500 ms.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    stockdesk_core::list::DEFAULT_PAGE_SIZE
}
fn default_search_debounce_ms() -> u64 {
    400
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://stock.example.com/api").
    pub api_url: String,

    /// Session token (plaintext, prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Username remembered from the last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockdesk", "stockdesk")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

pub(crate) fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("stockdesk");
    p
}

pub(crate) fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path: defaults, then the TOML file (if present),
/// then `STOCKDESK_*` variables (`__` separates nested keys, e.g.
/// `STOCKDESK_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOCKDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Session token ───────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Resolve a stored session token: system keyring, then the profile's
/// `token_env` variable (or `STOCKDESK_TOKEN`), then plaintext in config.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 2. Environment
    let env_name = profile.token_env.as_deref().unwrap_or(TOKEN_ENV);
    if let Ok(val) = std::env::var(env_name) {
        if !val.trim().is_empty() {
            return Some(SecretString::from(val));
        }
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Store the session token in the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    debug!(profile = profile_name, "token stored in keyring");
    Ok(())
}

/// Remove the keyring token. A missing entry is not an error.
pub fn delete_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and validate a base API URL. A trailing slash is added so
/// relative endpoint paths join under it.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "api_url".into(),
        reason,
    };
    let mut url: url::Url = raw
        .trim()
        .parse()
        .map_err(|e| invalid(format!("'{raw}' is not a URL ({e})")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "expected http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Build a `ConsoleConfig` from a profile and the global defaults, with no
/// CLI flag overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let url = parse_api_url(&profile.api_url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut config = ConsoleConfig::new(url);
    config.token = resolve_token(profile, profile_name);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.search_debounce =
        debounce::clamp_window(Duration::from_millis(defaults.search_debounce_ms));
    config.page_size = defaults.page_size.max(1);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.page_size, 10);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn saved_profiles_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.timeout = 12;
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                api_url: "https://staging.example.com/api".into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[profiles.staging]"));
        assert!(!written.contains("token"));

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.timeout, 12);
        assert_eq!(loaded.profile_names(), vec!["staging".to_owned()]);
        assert_eq!(
            loaded.profile("staging").unwrap().username.as_deref(),
            Some("admin")
        );
        assert!(matches!(
            loaded.profile("prod"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn api_url_gets_trailing_slash() {
        let url = parse_api_url("https://stock.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://stock.example.com/api/");
        assert!(parse_api_url("ftp://stock.example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn profile_translation_applies_overrides() {
        let profile = Profile {
            api_url: "http://localhost:3000/api".into(),
            token: Some("plain".into()),
            token_env: Some("STOCKDESK_TEST_UNSET_TOKEN_VAR".into()),
            timeout: Some(5),
            insecure: Some(true),
            ..Profile::default()
        };
        let defaults = Defaults {
            search_debounce_ms: 900,
            ..Defaults::default()
        };
        let cfg = profile_to_console_config(&profile, "stockdesk-test-profile", &defaults).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(matches!(cfg.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(cfg.search_debounce, Duration::from_millis(500));
        assert!(cfg.token.is_some());
    }
}
