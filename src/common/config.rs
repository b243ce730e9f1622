//! Configuration for the appliance client
//!
//! Values are layered (lowest priority first): built-in defaults, an
//! optional TOML file, then `MVCTL_*` environment variables. The CLI applies
//! its own flags on top of the loaded value.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::common::{Error, Result};

/// Environment variable prefix (`MVCTL_NODE`, `MVCTL_API_TOKEN`, ...)
pub const ENV_PREFIX: &str = "MVCTL";

/// Connection settings for one appliance
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Appliance address (IP or hostname, optionally with port)
    #[serde(default)]
    pub node: String,

    /// Basic auth user
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// API token, used instead of username/password when present
    #[serde(default)]
    pub api_token: Option<String>,

    /// Default request timeout in seconds; unset leaves the choice to the
    /// caller (the CLI uses per-command defaults)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Verify the appliance TLS certificate
    #[serde(default)]
    pub verify_tls: bool,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node: String::new(),
            username: None,
            password: None,
            api_token: None,
            timeout_secs: None,
            verify_tls: false,
            log_level: default_log_level(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("node", &self.node)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// How the client authenticates against the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Token(String),
}

impl ClientConfig {
    /// Load defaults, then `path` (if given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Values stay strings until deserialization so credentials such as
    /// `0123` keep their exact text.
    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("verify_tls", false)?
            .set_default("log_level", default_log_level())?;

        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder.add_source(env).build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check that the config is usable for a connection
    pub fn validate(&self) -> Result<()> {
        if self.node.trim().is_empty() {
            return Err(Error::InvalidConfig("node address is required".into()));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::InvalidConfig("timeout_secs must be positive".into()));
        }
        self.credentials().map(|_| ())
    }

    /// Resolve which credentials to use. A token wins over basic auth.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Credentials::Token(token.to_string()));
        }
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() => Ok(Credentials::Basic {
                username: u.to_string(),
                password: p.to_string(),
            }),
            _ => Err(Error::InvalidConfig(
                "either api_token or username and password must be set".into(),
            )),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Per-call timeout: explicit value, then the configured one, then
    /// `fallback`
    pub fn timeout_or(&self, explicit: Option<Duration>, fallback: Duration) -> Duration {
        explicit.or(self.timeout()).unwrap_or(fallback)
    }
}
