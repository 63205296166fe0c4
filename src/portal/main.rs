// src/portal/main.rs

use std::process::ExitCode;

use cristie::config::get_config;
use cristie::errors::CristieResult;
use cristie::logging::init_logging;
use cristie::module::{load_params, ModuleResponse};
use cristie::portal::{self, DownloadParams};

/// `cristie_download`: download the latest (or a given archived) installer
/// of a Cristie product from the portal.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ModuleResponse::from(run().await).emit()
}

async fn run() -> CristieResult<ModuleResponse> {
    let config = get_config()?;
    init_logging(&config.logging);

    let params: DownloadParams = load_params()?;
    portal::run(&params, config).await
}
