//! Structured logging for the modules.
//!
//! Stdout is reserved for the JSON result the caller parses, so everything
//! here writes to stderr, and only when `logging.enabled` is set.

use std::str::FromStr;

use tracing::{info, info_span, warn, Level};

use crate::config::LoggingConfig;
use crate::product::Product;

/// Install the stderr subscriber if logging is enabled.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }

    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Milestones of a license activation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseEvent {
    /// licmgr reported the current status
    StatusRead,
    /// Contract code registered with `--cid`
    ContractRegistered,
    /// Portal credentials attached with `--cred`
    CredentialsAttached,
    /// Offline activation code applied with `--act`
    CodeApplied,
    /// Activation finished and the status changed
    Activated,
    /// Activation finished but the status stayed the same
    Unchanged,
    /// A licmgr call failed
    Failed,
}

impl std::fmt::Display for LicenseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LicenseEvent::StatusRead => "status_read",
            LicenseEvent::ContractRegistered => "contract_registered",
            LicenseEvent::CredentialsAttached => "credentials_attached",
            LicenseEvent::CodeApplied => "code_applied",
            LicenseEvent::Activated => "activated",
            LicenseEvent::Unchanged => "unchanged",
            LicenseEvent::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Log a license event for `product` with optional details.
pub fn log_license_event(event: LicenseEvent, product: Product, details: Option<&str>) {
    let span = info_span!(
        "license_event",
        event = %event,
        product = %product,
    );
    let _enter = span.enter();

    match event {
        LicenseEvent::Failed => {
            if let Some(d) = details {
                warn!(reason = %d, "License event occurred");
            } else {
                warn!("License event occurred");
            }
        }
        _ => {
            if let Some(d) = details {
                info!(details = %d, "License event occurred");
            } else {
                info!("License event occurred");
            }
        }
    }
}
