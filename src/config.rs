//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$INVOICEDROP_CONFIG` (environment variable)
//! 2. `~/.config/invoicedrop/config.toml` (Linux/macOS)
//!    `%APPDATA%\invoicedrop\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! Secrets are never read from the file: the IMAP app password comes from
//! `$INVOICEDROP_IMAP_PASSWORD` and the Drive access token from
//! `$INVOICEDROP_DRIVE_TOKEN`.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DropError, Result};

/// Environment variable holding the IMAP app password.
pub const IMAP_PASSWORD_VAR: &str = "INVOICEDROP_IMAP_PASSWORD";

/// Environment variable holding the Drive OAuth access token.
pub const DRIVE_TOKEN_VAR: &str = "INVOICEDROP_DRIVE_TOKEN";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mail store connection settings.
    pub imap: ImapConfig,
    /// Message search filter.
    pub filter: FilterConfig,
    /// Local staging directory settings.
    pub local: LocalConfig,
    /// Remote storage settings.
    pub drive: DriveConfig,
    /// General behavior settings.
    pub general: GeneralConfig,
}

/// Mail store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    /// IMAP server hostname.
    pub host: String,
    /// IMAP TLS port.
    pub port: u16,
    /// Login username (usually the mailbox address).
    pub user: String,
    /// Mailbox to select after login.
    pub mailbox: String,
}

/// Message search filter. Present fields are combined conjunctively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Recipient address (`TO`). Empty = not filtered.
    pub to: String,
    /// Subject substring. Empty = not filtered.
    pub subject: String,
    /// Earliest received date (day granularity), as an ISO date string.
    pub since: Option<NaiveDate>,
}

/// Local staging directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Directory where fetched PDFs are staged.
    pub dir: PathBuf,
}

/// Remote storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Target folder name in Drive.
    pub folder: String,
    /// Drive API base URL (overridable for tests).
    pub api_base: String,
    /// Drive upload base URL (overridable for tests).
    pub upload_base: String,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: "imap.gmail.com".to_string(),
            port: 993,
            user: String::new(),
            mailbox: "INBOX".to_string(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("invoices"),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            folder: "Invoices".to_string(),
            api_base: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base: "https://www.googleapis.com/upload/drive/v3".to_string(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration from an explicit path or the standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config(explicit: Option<&std::path::Path>) -> Config {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config_file_path(),
    };

    if let Some(path) = path {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("INVOICEDROP_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("invoicedrop").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invoicedrop")
}

// ── Secrets ─────────────────────────────────────────────────────

/// Read the IMAP app password from the environment.
pub fn imap_password() -> Result<String> {
    std::env::var(IMAP_PASSWORD_VAR).map_err(|_| DropError::MissingCredential(IMAP_PASSWORD_VAR))
}

/// Read the Drive access token from the environment.
pub fn drive_token() -> Result<String> {
    std::env::var(DRIVE_TOKEN_VAR).map_err(|_| DropError::MissingCredential(DRIVE_TOKEN_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.imap.host, "imap.gmail.com");
        assert_eq!(cfg.imap.port, 993);
        assert_eq!(cfg.imap.mailbox, "INBOX");
        assert_eq!(cfg.drive.folder, "Invoices");
        assert_eq!(cfg.local.dir, PathBuf::from("invoices"));
        assert_eq!(cfg.general.log_level, "warn");
        assert!(cfg.filter.since.is_none());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let mut cfg = Config::default();
        cfg.filter.since = NaiveDate::from_ymd_opt(2025, 6, 5);
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.imap.host, cfg.imap.host);
        assert_eq!(parsed.filter.since, cfg.filter.since);
        assert_eq!(parsed.drive.api_base, cfg.drive.api_base);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[filter]
to = "billing@example.com"
subject = "Invoice"
since = "2025-06-05"

[drive]
folder = "Receipts"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.filter.to, "billing@example.com");
        assert_eq!(cfg.filter.subject, "Invoice");
        assert_eq!(cfg.filter.since, NaiveDate::from_ymd_opt(2025, 6, 5));
        assert_eq!(cfg.drive.folder, "Receipts");
        // Other fields use defaults
        assert_eq!(cfg.imap.host, "imap.gmail.com");
        assert_eq!(cfg.imap.port, 993);
        assert_eq!(cfg.local.dir, PathBuf::from("invoices"));
    }

    #[test]
    fn test_missing_password_is_reported() {
        // The variable is not set in the test environment
        std::env::remove_var(IMAP_PASSWORD_VAR);
        let err = imap_password().unwrap_err();
        assert!(err.to_string().contains(IMAP_PASSWORD_VAR));
    }
}
