//! The `cristie_info` module: validates its arguments and hands them back
//! as metadata without touching the system.

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{CristieError, CristieResult};
use crate::module::ModuleResponse;
use crate::product::Product;

const REDACTED: &str = "VALUE_SPECIFIED_IN_NO_LOG_PARAMETER";

/// Arguments of the `cristie_info` module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoParams {
    pub product: Product,
    pub contract: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, serialize_with = "redact")]
    pub password: Option<String>,
    #[serde(default)]
    pub license_code: Option<String>,
    #[serde(default)]
    pub offline: bool,
}

fn redact<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_str(REDACTED),
        None => serializer.serialize_none(),
    }
}

/// Echo the parameters back, password masked. Never changes anything.
pub fn run(params: &InfoParams) -> CristieResult<ModuleResponse> {
    if params.product == Product::Clone {
        return Err(CristieError::Arguments(
            "value of product must be one of: ABMR, CBMR, CoBMR, TBMR, got: clone".to_string(),
        ));
    }

    Ok(ModuleResponse::ok(false, format!("{} module parameters", params.product)).with_meta(params))
}
