// src/licmgr/main.rs

use std::process::ExitCode;

use cristie::config::get_config;
use cristie::errors::CristieResult;
use cristie::licmgr::{self, LicenseParams};
use cristie::logging::init_logging;
use cristie::module::{load_params, ModuleResponse};

/// `cristie_license`: license an installed Cristie product online (contract
/// code plus portal credentials) or offline (activation code) via licmgr.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ModuleResponse::from(run().await).emit()
}

async fn run() -> CristieResult<ModuleResponse> {
    let config = get_config()?;
    init_logging(&config.logging);

    let params: LicenseParams = load_params()?;
    licmgr::run(&params, config).await
}
