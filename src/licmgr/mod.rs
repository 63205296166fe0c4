//! License activation through the local `licmgr` executable.
//!
//! Backs the `cristie_license` module. Each run reads the current status,
//! activates online or offline, reads the status again and reports whether
//! it changed.

pub mod activator;
pub mod request;
pub mod runner;
pub mod status;

pub use activator::{ActivationResult, Activator};
pub use request::ActivationRequest;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use status::LicenseStatus;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CristieConfig;
use crate::errors::CristieResult;
use crate::module::{non_empty, ModuleResponse};
use crate::product::Product;

/// Arguments of the `cristie_license` module.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseParams {
    pub product: Product,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub contract_code: Option<String>,
    #[serde(default, alias = "activation_code")]
    pub act_code: Option<String>,
    /// Accepted for compatibility, no licmgr flag is sent for it
    #[serde(default)]
    pub request_sig: bool,
    /// Overrides `licmgr.path` from the configuration
    #[serde(default)]
    pub licmgr_path: Option<PathBuf>,
}

impl LicenseParams {
    /// Build the request. Fails before anything is executed when the fields
    /// do not describe an online or offline activation.
    pub fn request(&self) -> CristieResult<ActivationRequest> {
        ActivationRequest::from_fields(
            non_empty(&self.username),
            non_empty(&self.password),
            non_empty(&self.contract_code),
            non_empty(&self.act_code),
        )
    }
}

/// Module metadata: the activation result plus the echoed `request_sig`.
#[derive(Debug, Serialize)]
struct LicenseMeta<'a> {
    #[serde(flatten)]
    result: &'a ActivationResult,
    request_sig: bool,
}

/// Run the license module with the system licmgr.
pub async fn run(params: &LicenseParams, config: &CristieConfig) -> CristieResult<ModuleResponse> {
    let licmgr_path = params
        .licmgr_path
        .clone()
        .unwrap_or_else(|| config.licmgr.path.clone());
    let activator = Activator::new(
        SystemRunner::new(config.licmgr.timeout()),
        licmgr_path,
        params.product,
    );

    license(&activator, params).await
}

/// Decide the activation type, activate and build the module result.
pub async fn license<R: CommandRunner>(
    activator: &Activator<R>,
    params: &LicenseParams,
) -> CristieResult<ModuleResponse> {
    let request = params.request()?;
    debug!(
        online = request.is_online(),
        request_sig = params.request_sig,
        "Activation type determined"
    );

    let result = activator.activate(&request).await?;

    let meta = LicenseMeta {
        result: &result,
        request_sig: params.request_sig,
    };

    Ok(ModuleResponse::ok(result.changed, result.msg.clone()).with_meta(&meta))
}
