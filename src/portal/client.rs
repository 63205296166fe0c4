use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::catalog::DownloadCatalog;
use super::transport::{ByteStream, HttpTransport};
use crate::credentials::Credentials;
use crate::errors::{CristieError, CristieResult};

/// Bearer token returned by `/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(********)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Client for the Cristie portal API.
#[derive(Debug, Clone)]
pub struct PortalClient<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> PortalClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and return the session token.
    pub async fn authenticate(&self, credentials: &Credentials) -> CristieResult<AuthToken> {
        let url = format!("{}/login", self.base_url);
        let payload = json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        let resp = self
            .transport
            .post_json(&url, &payload)
            .await
            .map_err(|e| CristieError::Auth {
                detail: e.to_string(),
            })?;

        if !resp.is_ok() {
            return Err(CristieError::Auth {
                detail: format!("login returned HTTP status {}", resp.status),
            });
        }

        let body: LoginResponse = resp.json().map_err(|e| CristieError::Auth {
            detail: format!("failed to parse login response: {e}"),
        })?;

        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CristieError::Auth {
                detail: "login response did not contain a token".to_string(),
            })?;

        info!(username = %credentials.username, "Authenticated with portal");
        Ok(AuthToken(token))
    }

    /// Fetch the download list.
    pub async fn list_catalog(&self, token: &AuthToken) -> CristieResult<DownloadCatalog> {
        let url = format!("{}/downloads/list", self.base_url);

        let resp = self
            .transport
            .get(&url, Some(token.as_str()))
            .await
            .map_err(|e| CristieError::Catalog {
                detail: e.to_string(),
            })?;

        if !resp.is_ok() {
            return Err(CristieError::Catalog {
                detail: format!("no downloads found, HTTP status {}", resp.status),
            });
        }

        let catalog: DownloadCatalog = resp.json().map_err(|e| CristieError::Catalog {
            detail: format!("failed to parse download list: {e}"),
        })?;

        debug!(products = catalog.products.len(), "Fetched download list");
        Ok(catalog)
    }

    /// Stream `url` into `dest_dir`, named after the URL's last path segment.
    ///
    /// The body goes to `<name>.part` first and is renamed once complete; a
    /// failed download removes the partial file.
    pub async fn download_artifact(&self, url: &str, dest_dir: &Path) -> CristieResult<PathBuf> {
        let filename = artifact_filename(url).ok_or_else(|| CristieError::Download {
            detail: format!("cannot derive a file name from {url}"),
        })?;
        let target = dest_dir.join(filename);
        let partial = dest_dir.join(format!("{filename}.part"));

        info!(url, target = %target.display(), "Downloading artifact");

        let result = match self.stream_to(url, &partial).await {
            Ok(bytes) => fs::rename(&partial, &target)
                .await
                .map(|()| bytes)
                .map_err(|e| CristieError::Download {
                    detail: format!("failed to move {} into place: {e}", partial.display()),
                }),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                info!(bytes, "Download complete");
                Ok(target)
            }
            Err(e) => {
                warn!(error = %e, "Download failed, removing partial file");
                let _ = fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &str, path: &Path) -> CristieResult<u64> {
        let mut stream = self
            .transport
            .get_stream(url)
            .await
            .map_err(|e| CristieError::Download {
                detail: e.to_string(),
            })?;

        let mut file = File::create(path).await.map_err(|e| CristieError::Download {
            detail: format!("failed to create {}: {e}", path.display()),
        })?;

        let mut written = 0u64;
        while let Some(chunk) = stream.next_chunk().await.map_err(|e| CristieError::Download {
            detail: e.to_string(),
        })? {
            file.write_all(&chunk).await.map_err(|e| CristieError::Download {
                detail: format!("write error: {e}"),
            })?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| CristieError::Download {
            detail: format!("write error: {e}"),
        })?;

        Ok(written)
    }
}

/// Last path segment of `url`, ignoring any query string or fragment.
pub fn artifact_filename(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}
