use std::fmt;

use serde::Serialize;

/// License state of a product as reported by `licmgr -p <PRODUCT>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LicenseStatus {
    Trial,
    Full,
    Unknown,
}

impl LicenseStatus {
    /// Classify licmgr stdout. The match is on exact wording and case, and
    /// trial wins if both phrases appear.
    pub fn from_output(stdout: &str) -> Self {
        if stdout.contains("Trial licence") {
            LicenseStatus::Trial
        } else if stdout.contains("Full licence") {
            LicenseStatus::Full
        } else {
            LicenseStatus::Unknown
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LicenseStatus::Trial => "Trial license",
            LicenseStatus::Full => "Full license",
            LicenseStatus::Unknown => "Unknown license",
        };
        write!(f, "{}", s)
    }
}
