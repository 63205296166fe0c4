//! Download list returned by the portal and artifact selection.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::product::{PackageType, Platform, Product};

/// Everything the portal offers, keyed by lowercase product name.
///
/// Entries stay raw JSON until a product is asked for, so a malformed entry
/// for one product (or an unrelated top-level key) does not spoil the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadCatalog {
    pub products: HashMap<String, serde_json::Value>,
}

/// Latest and archived releases of one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductReleases {
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest: Vec<Release>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: Vec<Release>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, deserialize_with = "null_as_default")]
    pub installs: Vec<Artifact>,
}

/// A single downloadable installer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which releases of a product to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseGroup {
    Latest,
    Archived,
}

/// What the caller asked to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub product: Product,
    pub platform: Platform,
    pub package: PackageType,
    pub version: Option<String>,
}

impl SelectionCriteria {
    /// A specific version is looked up among the archived releases, anything
    /// else among the latest ones.
    pub fn group(&self) -> ReleaseGroup {
        match self.version {
            Some(_) => ReleaseGroup::Archived,
            None => ReleaseGroup::Latest,
        }
    }

    fn matches(&self, artifact: &Artifact, group: ReleaseGroup) -> bool {
        let base = artifact.product == self.product.code()
            && artifact.platform == self.platform.as_str()
            && artifact.url.contains(self.package.as_str());

        match group {
            ReleaseGroup::Latest => base,
            ReleaseGroup::Archived => {
                base && self.version.as_deref() == Some(artifact.version.as_str())
            }
        }
    }
}

impl DownloadCatalog {
    /// Releases of `product`, or `None` when it is absent or unreadable.
    pub fn releases(&self, product: Product) -> Option<ProductReleases> {
        let entry = self.products.get(product.catalog_key())?;
        match ProductReleases::deserialize(entry) {
            Ok(releases) => Some(releases),
            Err(e) => {
                warn!(product = %product, error = %e, "Unreadable download list entry");
                None
            }
        }
    }
}

/// Pick the first artifact in catalog order matching `criteria`.
///
/// Returns `None` when nothing matches, including when the product is not in
/// the catalog at all. Releases are not sorted; catalog order decides.
pub fn select_artifact(
    catalog: &DownloadCatalog,
    criteria: &SelectionCriteria,
    group: ReleaseGroup,
) -> Option<Artifact> {
    let releases = catalog.releases(criteria.product)?;
    let releases = match group {
        ReleaseGroup::Latest => releases.latest,
        ReleaseGroup::Archived => releases.archived,
    };

    releases
        .into_iter()
        .flat_map(|release| release.installs)
        .find(|artifact| criteria.matches(artifact, group))
}
