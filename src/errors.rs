//! Error types shared by the portal client, the license activator and the
//! module entry points.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type CristieResult<T> = Result<T, CristieError>;

/// Everything that can end a module invocation.
///
/// None of these are retried. The module entry points turn them into a
/// failure envelope where `msg` is the `Display` text and `error` is
/// [`CristieError::detail`].
#[derive(Debug, Error)]
pub enum CristieError {
    /// Login against the portal failed.
    #[error("authentication with the portal failed")]
    Auth { detail: String },

    /// The download list could not be retrieved or parsed.
    #[error("error getting download list")]
    Catalog { detail: String },

    /// Streaming the installer to disk failed.
    #[error("download failed")]
    Download { detail: String },

    /// A username, contract code or activation code is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The license manager executable is not where we were told it is.
    #[error("unable to find licmgr at {}, please check the path is correct", .0.display())]
    LicenseManagerMissing(PathBuf),

    /// The license manager could not be run, timed out or exited non-zero.
    #[error("licmgr failed while {stage}")]
    LicenseManagerError {
        stage: &'static str,
        exit_code: Option<i32>,
        detail: String,
    },

    /// licmgr ran fine but its output matched neither known status.
    #[error("unknown license status reported by licmgr")]
    UnknownLicenceStatus { stdout: String },

    /// Username and password were given without a contract code.
    #[error("Online activation: contract code empty or not supplied")]
    ContractCodeMissing,

    /// Neither online nor offline activation fields are populated.
    #[error(
        "unable to determine activation type, please supply an activation code \
         or a username, password and contract code"
    )]
    ActivationTypeAmbiguous,

    /// The module arguments file was missing or malformed.
    #[error("invalid module arguments: {0}")]
    Arguments(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CristieError {
    /// Supplementary detail for the `error` field of a failure envelope.
    pub fn detail(&self) -> Option<String> {
        match self {
            CristieError::Auth { detail }
            | CristieError::Catalog { detail }
            | CristieError::Download { detail } => Some(detail.clone()),
            CristieError::LicenseManagerError {
                exit_code, detail, ..
            } => Some(match exit_code {
                Some(code) => format!("exit code {code}: {detail}"),
                None => detail.clone(),
            }),
            CristieError::UnknownLicenceStatus { stdout } => Some(stdout.clone()),
            _ => None,
        }
    }
}

/// Broad classification of an HTTP transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The server answered with an error status.
    Http,
    /// The connection could not be established.
    Connection,
    /// The request or connection timed out.
    Timeout,
    /// Anything else (body decoding, redirects, builder errors).
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Http => "HTTP error",
            TransportErrorKind::Connection => "connection error",
            TransportErrorKind::Timeout => "timeout error",
            TransportErrorKind::Other => "request error",
        };
        write!(f, "{}", s)
    }
}

/// Failure reported by an [`HttpTransport`](crate::portal::HttpTransport).
#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connection
        } else if err.is_status() {
            TransportErrorKind::Http
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}
