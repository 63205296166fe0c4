// src/info/main.rs

use std::process::ExitCode;

use cristie::errors::CristieResult;
use cristie::info::{self, InfoParams};
use cristie::module::{load_params, ModuleResponse};

/// `cristie_info`: report the module parameters as metadata.
fn main() -> ExitCode {
    ModuleResponse::from(run()).emit()
}

fn run() -> CristieResult<ModuleResponse> {
    let params: InfoParams = load_params()?;
    info::run(&params)
}
