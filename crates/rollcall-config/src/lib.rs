//! Shared configuration for the rollcall board.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `rollcall_core::FeedConfig` / `LayoutConfig`. The TUI
//! layers its CLI flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rollcall_core::{FeedConfig, LayoutConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEYRING_SERVICE: &str = "rollcall";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global layout and keepalive defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named feed endpoints.
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
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default = "default_columns")]
    pub max_columns_per_page: usize,

    #[serde(default = "default_rows")]
    pub max_rows_per_column: usize,

    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_columns_per_page: default_columns(),
            max_rows_per_column: default_rows(),
            keepalive_secs: default_keepalive(),
        }
    }
}

fn default_columns() -> usize {
    10
}
fn default_rows() -> usize {
    20
}
fn default_keepalive() -> u64 {
    30
}

/// A named feed endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    /// Dashboard feed URL (`ws(s)://` or `http(s)://`).
    pub endpoint: String,

    /// Bearer token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Override `defaults.max_columns_per_page`.
    pub max_columns_per_page: Option<usize>,

    /// Override `defaults.max_rows_per_column`.
    pub max_rows_per_column: Option<usize>,

    /// Override `defaults.keepalive_secs`.
    pub keepalive_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "rollcall", "rollcall").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rollcall");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file. A missing file yields defaults.
///
/// `ROLLCALL_`-prefixed variables override the file; nested keys use a
/// double underscore (`ROLLCALL_DEFAULTS__MAX_ROWS_PER_COLUMN=15`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROLLCALL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

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
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve the bearer token from the credential chain.
///
/// `None` is a valid outcome: the feed may be unauthenticated.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_with(profile, profile_name, |name| std::env::var(name).ok())
}

fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(value) = profile.token_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the feed client and layout settings for a profile, without CLI
/// flag overrides.
pub fn profile_to_feed_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<(FeedConfig, LayoutConfig), ConfigError> {
    let mut feed = feed_config(
        &profile.endpoint,
        profile.keepalive_secs.unwrap_or(defaults.keepalive_secs),
    )?;
    if let Some(token) = resolve_token(profile, profile_name) {
        feed = feed.with_token(token);
    }

    let layout = layout_config(
        profile
            .max_columns_per_page
            .unwrap_or(defaults.max_columns_per_page),
        profile
            .max_rows_per_column
            .unwrap_or(defaults.max_rows_per_column),
    )?;

    Ok((feed, layout))
}

/// Build settings for an endpoint given on the command line. Timing and
/// geometry come from `defaults`; no token is resolved.
pub fn url_to_feed_config(
    endpoint: &str,
    defaults: &Defaults,
) -> Result<(FeedConfig, LayoutConfig), ConfigError> {
    let feed = feed_config(endpoint, defaults.keepalive_secs)?;
    let layout = layout_config(defaults.max_columns_per_page, defaults.max_rows_per_column)?;
    Ok((feed, layout))
}

fn feed_config(endpoint: &str, keepalive_secs: u64) -> Result<FeedConfig, ConfigError> {
    let url: url::Url = endpoint.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint}"),
    })?;
    let mut feed = FeedConfig::new(url).map_err(|e| ConfigError::Validation {
        field: "endpoint".into(),
        reason: e.to_string(),
    })?;

    if keepalive_secs == 0 {
        return Err(ConfigError::Validation {
            field: "keepalive_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }
    feed.keepalive = Duration::from_secs(keepalive_secs);
    Ok(feed)
}

/// Validate a page geometry.
pub fn layout_config(columns: usize, rows: usize) -> Result<LayoutConfig, ConfigError> {
    LayoutConfig::new(columns, rows).map_err(|e| ConfigError::Validation {
        field: "layout".into(),
        reason: e.to_string(),
    })
}

// ── Tests ───────────────────────────────────────────────────────────
