//! # Application Configuration
//!
//! Connection, PDF hand-off and business header settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority)                              │
//! │     nethra --api-url http://192.168.1.20:5000 ...                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     NETHRA_API_URL, NETHRA_API_TOKEN, NETHRA_TIMEOUT_SECS,             │
//! │     NETHRA_DOWNLOAD_DIR, NETHRA_PRINT_COMMAND, NETHRA_SHARE_COMMAND    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/billing/config.toml (Linux)                              │
//! │     ~/Library/Application Support/in.nethra.billing/config.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, 10 s timeout, 30 s PDF timeout              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://192.168.1.20:5000"
//! timeout_secs = 10
//! pdf_timeout_secs = 30
//!
//! [pdf]
//! download_dir = "/home/shop/Invoices"
//! print_command = "lp -d counter"
//! share_command = "xdg-email --attach {file} --subject {message}"
//! share_cleanup_secs = 5
//! print_cleanup_secs = 3
//!
//! [business]
//! name = "Nethra Food Products"
//! phone = "+91 98765 43210"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use nethra_api::client::{DEFAULT_API_URL, DEFAULT_PDF_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use nethra_api::pdf::{default_open_command, default_print_command};
use nethra_api::ClientConfig;
use nethra_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// API Settings
// =============================================================================

/// Where the billing backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Server root. Endpoint paths are appended to this.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Not used by the stock deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// PDF generation can take much longer than ordinary calls.
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_pdf_timeout() -> u64 {
    DEFAULT_PDF_TIMEOUT_SECS
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
            pdf_timeout_secs: default_pdf_timeout(),
        }
    }
}

// =============================================================================
// PDF Settings
// =============================================================================

/// Where PDFs go and which programs receive them.
///
/// Command templates are split on whitespace. `{file}` is replaced by the
/// PDF path (appended when absent) and `{message}` by the share text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfSettings {
    /// Downloads land here. Defaults to the user's Downloads folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Temporary copies for sharing and printing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_command: Option<String>,

    /// Without one, `--share` leaves the file in place and prints the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_command: Option<String>,

    #[serde(default = "default_share_cleanup")]
    pub share_cleanup_secs: u64,

    #[serde(default = "default_print_cleanup")]
    pub print_cleanup_secs: u64,
}

fn default_share_cleanup() -> u64 {
    nethra_api::pdf::SHARE_CLEANUP_DELAY.as_secs()
}

fn default_print_cleanup() -> u64 {
    nethra_api::pdf::PRINT_CLEANUP_DELAY.as_secs()
}

impl Default for PdfSettings {
    fn default() -> Self {
        PdfSettings {
            download_dir: None,
            cache_dir: None,
            open_command: None,
            print_command: None,
            share_command: None,
            share_cleanup_secs: default_share_cleanup(),
            print_cleanup_secs: default_print_cleanup(),
        }
    }
}

impl PdfSettings {
    /// Configured download directory, else the platform Downloads folder,
    /// else the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| {
                directories::UserDirs::new()
                    .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Configured cache directory, else the platform cache dir, else temp.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.cache_dir().to_path_buf()))
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn open_command(&self) -> String {
        self.open_command
            .clone()
            .unwrap_or_else(|| default_open_command().to_string())
    }

    pub fn print_command(&self) -> Option<String> {
        self.print_command
            .clone()
            .or_else(|| default_print_command().map(str::to_string))
    }

    pub fn share_command(&self) -> Option<&str> {
        self.share_command.as_deref()
    }

    #[inline]
    pub fn share_cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.share_cleanup_secs)
    }

    #[inline]
    pub fn print_cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.print_cleanup_secs)
    }
}

// =============================================================================
// Business Header
// =============================================================================

/// Seller details shown above a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    #[serde(default = "default_business_name")]
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    /// Currency symbol for display.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_business_name() -> String {
    "Nethra Food Products".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for BusinessInfo {
    fn default() -> Self {
        BusinessInfo {
            name: default_business_name(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub pdf: PdfSettings,

    #[serde(default)]
    pub business: BusinessInfo,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// The file layer alone: defaults overlaid with `config.toml`, without
    /// environment overrides or validation.
    pub fn load_file(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// What `config init` writes: the effective settings, except that the
    /// API token is only kept when the file already held it.
    pub fn for_saving(&self, file_layer: &AppConfig) -> AppConfig {
        let mut saved = self.clone();
        saved.api.token = file_layer.api.token.clone();
        saved
    }

    /// Saves configuration to file and returns where it was written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.api.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.pdf_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "pdf_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies the `--api-url` flag, the last layer.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            debug!(url = %url, "Overriding API URL from command line");
            self.api.base_url = url;
        }
        self
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `NETHRA_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NETHRA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = lookup("NETHRA_API_TOKEN") {
            self.api.token = Some(token).filter(|t| !t.trim().is_empty());
        }

        if let Some(timeout) = lookup("NETHRA_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid NETHRA_TIMEOUT_SECS"),
            }
        }

        if let Some(dir) = lookup("NETHRA_DOWNLOAD_DIR") {
            self.pdf.download_dir = Some(PathBuf::from(dir));
        }

        if let Some(command) = lookup("NETHRA_PRINT_COMMAND") {
            self.pdf.print_command = Some(command);
        }

        if let Some(command) = lookup("NETHRA_SHARE_COMMAND") {
            self.pdf.share_command = Some(command);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Settings for [`nethra_api::ApiClient::new`].
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.trim().to_string(),
            token: None,
            timeout: Duration::from_secs(self.api.timeout_secs),
            pdf_timeout: Duration::from_secs(self.api.pdf_timeout_secs),
        }
        .with_token(self.api.token.clone())
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_paise(12345)), "₹123.45");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let paise = amount.paise();
        format!(
            "{}{}{}.{:02}",
            if paise < 0 { "-" } else { "" },
            self.business.currency_symbol,
            (paise / 100).abs(),
            (paise % 100).abs()
        )
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("in", "nethra", "billing")
}
