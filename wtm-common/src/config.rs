//! Configuration loading and resolution
//!
//! Follows a 4-tier priority order for the config file location:
//! 1. Command-line argument (highest priority)
//! 2. `WTM_CONFIG` environment variable
//! 3. Platform config directory (`<config dir>/wtm/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or unreadable config file never terminates startup; the
//! service logs a warning and runs on compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WTM_CONFIG";

/// Accepted release-identifier issuer prefixes (`CC-XXX` pairs).
///
/// The platform currently issues under a single Dominica registrant, but
/// the accepted set is configuration so other issuers can be onboarded
/// without a code change.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IssuerConfig {
    pub accepted_prefixes: Vec<String>,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        IssuerConfig {
            accepted_prefixes: vec!["DM-A0D".to_string()],
        }
    }
}

impl IssuerConfig {
    /// Case-insensitive membership test for a `CC-XXX` prefix
    pub fn accepts(&self, prefix: &str) -> bool {
        self.accepted_prefixes
            .iter()
            .any(|p| p.eq_ignore_ascii_case(prefix))
    }
}

/// Splitsheet service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address for the HTTP server
    pub bind: String,

    /// External creation/notification endpoint receiving submissions
    pub submission_url: String,

    /// Timeout for the submission request, in seconds
    pub submission_timeout_secs: u64,

    /// Accepted release-identifier issuers
    pub issuer: IssuerConfig,

    /// Whether the 100%-total check is a hard submission gate.
    /// When false the imbalance is reported but does not block.
    pub enforce_balance: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            bind: "127.0.0.1:5770".to_string(),
            submission_url: "http://127.0.0.1:5771/api/splitsheets".to_string(),
            submission_timeout_secs: 30,
            issuer: IssuerConfig::default(),
            enforce_balance: true,
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Resolve configuration using the 4-tier priority order.
    ///
    /// `cli_path` comes from the command line and wins when present.
    /// A missing file at any tier degrades to the next tier with a
    /// warning rather than failing startup.
    pub fn resolve(cli_path: Option<&Path>) -> Self {
        Self::resolve_with_default_path(cli_path, default_config_path().as_deref())
    }

    /// Resolution with an explicit tier-3 location.
    ///
    /// Tests inject a throwaway path here so the host machine's real
    /// config file never leaks into the result.
    pub fn resolve_with_default_path(
        cli_path: Option<&Path>,
        default_path: Option<&Path>,
    ) -> Self {
        if let Some(path) = cli_path {
            match Self::from_file(path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config {}: {e}", path.display()),
            }
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config {}: {e}", path.display()),
            }
        }

        if let Some(path) = default_path {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return config,
                    Err(e) => warn!("Failed to load config {}: {e}", path.display()),
                }
            }
        }

        warn!("No config file found, using compiled defaults");
        ServiceConfig::default()
    }
}

/// Platform config file path: `<config dir>/wtm/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wtm").join("config.toml"))
}
