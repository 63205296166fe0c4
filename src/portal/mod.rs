//! Portal client: log in, list downloads, pick an installer and fetch it.
//!
//! Backs the `cristie_download` module.

pub mod catalog;
pub mod client;
pub mod transport;

pub use catalog::{
    select_artifact, Artifact, DownloadCatalog, ProductReleases, Release, ReleaseGroup,
    SelectionCriteria,
};
pub use client::{artifact_filename, AuthToken, PortalClient};
pub use transport::{ByteStream, HttpResponse, HttpTransport, ReqwestTransport, ReqwestStream};

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::config::CristieConfig;
use crate::credentials::Credentials;
use crate::errors::CristieResult;
use crate::module::{non_empty, ModuleResponse};
use crate::product::{PackageType, Platform, Product};

pub const NO_SUITABLE_DOWNLOAD: &str = "unable to find a suitable download for chosen options";

/// Arguments of the `cristie_download` module.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadParams {
    pub username: String,
    pub password: String,
    pub product: Product,
    pub platform: Platform,
    pub package: PackageType,
    /// Fetch this archived version instead of the latest release
    #[serde(default)]
    pub version: Option<String>,
    /// Portal base URL override
    #[serde(default)]
    pub api_url: Option<String>,
    /// Download directory override
    #[serde(default)]
    pub dest: Option<PathBuf>,
}

impl DownloadParams {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            product: self.product,
            platform: self.platform,
            package: self.package,
            version: non_empty(&self.version).map(str::to_string),
        }
    }
}

/// Run the download module against the real portal.
pub async fn run(params: &DownloadParams, config: &CristieConfig) -> CristieResult<ModuleResponse> {
    let transport = ReqwestTransport::new(config.portal.connect_timeout())?;
    let base_url = non_empty(&params.api_url).unwrap_or(config.portal.base_url.as_str());
    let client = PortalClient::new(transport, base_url);
    let dest_dir = params
        .dest
        .clone()
        .unwrap_or_else(|| config.portal.download_dir());

    download(&client, params, &dest_dir).await
}

/// Validate, log in, list, select and download.
///
/// Finding no suitable installer is reported as an unchanged success, not
/// as a failure.
pub async fn download<T: HttpTransport>(
    client: &PortalClient<T>,
    params: &DownloadParams,
    dest_dir: &Path,
) -> CristieResult<ModuleResponse> {
    let credentials = params.credentials();
    credentials.validate()?;

    let token = client.authenticate(&credentials).await?;
    let catalog = client.list_catalog(&token).await?;

    let criteria = params.criteria();
    let Some(artifact) = select_artifact(&catalog, &criteria, criteria.group()) else {
        info!(
            product = %criteria.product,
            platform = %criteria.platform,
            package = %criteria.package,
            "No suitable download found"
        );
        return Ok(ModuleResponse::ok(false, NO_SUITABLE_DOWNLOAD));
    };

    let path = client.download_artifact(&artifact.url, dest_dir).await?;

    Ok(ModuleResponse::ok(true, "Successfully downloaded package")
        .with_filename(path.display().to_string())
        .with_meta(&artifact))
}
