//! Ansible binary module plumbing.
//!
//! Ansible runs a binary module with the path of a JSON file holding the
//! task arguments as its only argument and expects exactly one JSON object
//! on stdout. [`load_params`] reads the arguments and [`ModuleResponse`] is
//! the object written back.

use std::path::Path;
use std::process::ExitCode;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CristieError, CristieResult};

/// Result envelope printed to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResponse {
    pub changed: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,

    pub msg: String,

    /// Underlying transport or process detail on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Local path of a downloaded installer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ModuleResponse {
    /// Successful run.
    pub fn ok(changed: bool, msg: impl Into<String>) -> Self {
        Self {
            changed,
            failed: false,
            msg: msg.into(),
            error: None,
            filename: None,
            meta: None,
        }
    }

    /// Failed run with an optional detail.
    pub fn failure(msg: impl Into<String>, error: Option<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: msg.into(),
            error,
            filename: None,
            meta: None,
        }
    }

    pub fn from_error(err: &CristieError) -> Self {
        Self::failure(err.to_string(), err.detail())
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_meta<T: Serialize>(mut self, meta: &T) -> Self {
        // Only plain data structs are passed here; a failure leaves meta unset.
        self.meta = serde_json::to_value(meta).ok();
        self
    }

    /// Print the envelope and return the process exit code.
    pub fn emit(&self) -> ExitCode {
        match serde_json::to_string(self) {
            Ok(json) => println!("{json}"),
            Err(e) => println!(
                r#"{{"changed": false, "failed": true, "msg": "failed to encode module result: {e}"}}"#
            ),
        }

        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl From<CristieResult<ModuleResponse>> for ModuleResponse {
    fn from(result: CristieResult<ModuleResponse>) -> Self {
        result.unwrap_or_else(|e| ModuleResponse::from_error(&e))
    }
}

/// Read module parameters from the arguments file named on the command line.
pub fn load_params<P: DeserializeOwned>() -> CristieResult<P> {
    let path = std::env::args_os().nth(1).ok_or_else(|| {
        CristieError::Arguments("no arguments file was passed to the module".to_string())
    })?;
    load_params_from(Path::new(&path))
}

/// Read module parameters from a JSON arguments file.
pub fn load_params_from<P: DeserializeOwned>(path: &Path) -> CristieResult<P> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CristieError::Arguments(format!("unable to read {}: {e}", path.display()))
    })?;
    parse_params(&raw)
}

/// Parse module parameters from JSON text. Unknown keys are ignored.
pub fn parse_params<P: DeserializeOwned>(raw: &str) -> CristieResult<P> {
    serde_json::from_str(raw).map_err(|e| CristieError::Arguments(e.to_string()))
}

/// Treat empty strings the way the module arguments mean them: not given.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
