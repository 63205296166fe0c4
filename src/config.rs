//! Configuration for the Cristie modules.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `cristie.toml` file in the working directory
//! 3. Default values (lowest priority)
//!
//! Module arguments (`api_url`, `licmgr_path`, `dest`) override the loaded
//! values for a single invocation.
//!
//! # Environment Variables
//!
//! - `CRISTIE_PORTAL_URL` - Portal API base URL
//! - `CRISTIE_CONNECT_TIMEOUT_SECS` - Portal connect timeout in seconds
//! - `CRISTIE_DOWNLOAD_DIR` - Directory installers are downloaded into
//! - `CRISTIE_LICMGR_PATH` - Path to the licmgr executable
//! - `CRISTIE_LICMGR_TIMEOUT_SECS` - Timeout per licmgr call (0 disables)
//! - `CRISTIE_LOGGING_ENABLED` - Log to stderr
//! - `CRISTIE_LOG_LEVEL` - Log level (trace, debug, info, warn, error)

use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::errors::{CristieError, CristieResult};

/// Global configuration singleton.
static CONFIG: OnceLock<CristieConfig> = OnceLock::new();

pub const DEFAULT_PORTAL_URL: &str = "https://portal-staging.cristie.com/portal/v1";
pub const DEFAULT_LICMGR_PATH: &str = "/usr/bin/licmgr";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CristieConfig {
    /// Portal API configuration
    pub portal: PortalConfig,
    /// License manager configuration
    pub licmgr: LicmgrConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Portal API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL the `/login` and `/downloads/list` paths are appended to
    pub base_url: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Where installers are written; the system temp dir when unset
    pub download_dir: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PORTAL_URL.to_string(),
            connect_timeout_secs: 30,
            download_dir: None,
        }
    }
}

impl PortalConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

/// License manager configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LicmgrConfig {
    /// Path to the licmgr executable
    pub path: PathBuf,
    /// Timeout for each licmgr invocation, 0 waits forever
    pub timeout_secs: u64,
}

impl Default for LicmgrConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LICMGR_PATH),
            timeout_secs: 300,
        }
    }
}

impl LicmgrConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to stderr
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

fn config_error(e: ConfigError) -> CristieError {
    CristieError::Config(e.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

impl CristieConfig {
    /// Load configuration from defaults, `cristie.toml` and the environment.
    ///
    /// Unlike [`get_config`] this always reads the sources again and does
    /// not validate.
    pub fn load() -> CristieResult<Self> {
        let builder = Config::builder()
            .set_default("portal.base_url", DEFAULT_PORTAL_URL)
            .map_err(config_error)?
            .set_default("portal.connect_timeout_secs", 30)
            .map_err(config_error)?
            .set_default("licmgr.path", DEFAULT_LICMGR_PATH)
            .map_err(config_error)?
            .set_default("licmgr.timeout_secs", 300)
            .map_err(config_error)?
            .set_default("logging.enabled", false)
            .map_err(config_error)?
            .set_default("logging.level", "info")
            .map_err(config_error)?
            // Load from cristie.toml (optional)
            .add_source(config::File::with_name("cristie").required(false))
            // Override with environment variables
            .set_override_option("portal.base_url", env::var("CRISTIE_PORTAL_URL").ok())
            .map_err(config_error)?
            .set_override_option(
                "portal.connect_timeout_secs",
                env_parsed::<i64>("CRISTIE_CONNECT_TIMEOUT_SECS"),
            )
            .map_err(config_error)?
            .set_override_option("portal.download_dir", env::var("CRISTIE_DOWNLOAD_DIR").ok())
            .map_err(config_error)?
            .set_override_option("licmgr.path", env::var("CRISTIE_LICMGR_PATH").ok())
            .map_err(config_error)?
            .set_override_option(
                "licmgr.timeout_secs",
                env_parsed::<i64>("CRISTIE_LICMGR_TIMEOUT_SECS"),
            )
            .map_err(config_error)?
            .set_override_option(
                "logging.enabled",
                env_parsed::<bool>("CRISTIE_LOGGING_ENABLED"),
            )
            .map_err(config_error)?
            .set_override_option("logging.level", env::var("CRISTIE_LOG_LEVEL").ok())
            .map_err(config_error)?;

        let settings = builder
            .build()
            .map_err(|e| CristieError::Config(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| CristieError::Config(format!("failed to deserialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CristieResult<()> {
        let base_url = self.portal.base_url.trim();
        if base_url.is_empty() {
            return Err(CristieError::Config(
                "portal.base_url cannot be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CristieError::Config(format!(
                "portal.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        if self.licmgr.path.as_os_str().is_empty() {
            return Err(CristieError::Config(
                "licmgr.path cannot be empty".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(CristieError::Config(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// This loads the configuration on first access and caches it.
/// Returns an error if configuration loading or validation fails.
pub fn get_config() -> CristieResult<&'static CristieConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = CristieConfig::load()?;
    config.validate()?;

    Ok(CONFIG.get_or_init(|| config))
}
