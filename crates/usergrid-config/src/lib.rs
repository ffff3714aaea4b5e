//! Profile-based configuration for Usergrid clients.
//!
//! TOML profiles, secret resolution (env + keyring + plaintext), and
//! translation to `usergrid_api::ClientConfig`. [`connect`] goes one step
//! further and hands back a client that is already logged in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use usergrid_api::{AuthType, Client, ClientConfig, DEFAULT_BASE_URL, TlsMode, TransportConfig};

const KEYRING_SERVICE: &str = "usergrid";
const ENV_PREFIX: &str = "USERGRID_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' is not defined")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] usergrid_api::Error),
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
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named organization/application profiles.
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
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

/// Settings applied to every profile that doesn't override them.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named organization/application profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Service root, e.g. "https://usergrid.example.com/".
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub organization: String,

    pub application: String,

    /// Which kind of principal `login_id` names.
    #[serde(default)]
    pub auth_type: AuthType,

    /// Username, or client id for organization/application logins.
    /// No login happens without one.
    pub login_id: Option<String>,

    /// Plaintext secret (prefer keyring or env var).
    pub secret: Option<String>,

    /// Environment variable name containing the secret.
    pub secret_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "usergrid", "usergrid").map_or_else(
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
    p.push("usergrid");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file is not an error.
///
/// Environment overrides use `__` between keys, e.g.
/// `USERGRID_PROFILES__PROD__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

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

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a profile's login secret.
///
/// Order: the variable named by `secret_env`, then the system keyring
/// entry `usergrid/{profile}/secret`, then plaintext `secret`.
pub fn resolve_secret(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(env_name) = profile.secret_env.as_deref() {
        if let Ok(val) = std::env::var(env_name) {
            debug!(profile = profile_name, source = "env", "resolved secret");
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/secret")) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, source = "keyring", "resolved secret");
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(secret) = profile.secret.as_deref() {
        debug!(profile = profile_name, source = "plaintext", "resolved secret");
        return Ok(SecretString::from(secret.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Client construction ─────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, falling back to `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    url::Url::parse(&profile.base_url).map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {}", profile.base_url),
    })?;
    for (field, value) in [
        ("organization", &profile.organization),
        ("application", &profile.application),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must not be empty".into(),
            });
        }
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(
        ClientConfig::new(profile.organization.as_str(), profile.application.as_str())
            .with_base_url(profile.base_url.as_str())
            .with_transport(TransportConfig::default().with_tls(tls).with_timeout(timeout)),
    )
}

/// Build a client for the named profile (or the default one) and, when the
/// profile has a `login_id`, log it in.
pub async fn connect(config: &Config, profile_name: Option<&str>) -> Result<Client, ConfigError> {
    let (name, profile) = config.profile(profile_name)?;
    let client = Client::new(&profile_to_client_config(profile, &config.defaults)?)?;

    if let Some(login_id) = profile.login_id.as_deref() {
        let secret = resolve_secret(profile, name)?;
        client.login(login_id, &secret, profile.auth_type).await?;
        debug!(profile = name, "connected and logged in");
    } else {
        debug!(profile = name, "connected without login");
    }
    Ok(client)
}
