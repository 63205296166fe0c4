//! Product, platform and package choices accepted by the modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A Cristie product.
///
/// Parsed case-insensitively so both the download module's lowercase
/// choices (`cbmr`) and the license module's display names (`CoBMR`) work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Product {
    Abmr,
    Cbmr,
    Cobmr,
    Tbmr,
    Clone,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::Abmr,
        Product::Cbmr,
        Product::Cobmr,
        Product::Tbmr,
        Product::Clone,
    ];

    /// Key of this product in the portal's download list.
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Product::Abmr => "abmr",
            Product::Cbmr => "cbmr",
            Product::Cobmr => "cobmr",
            Product::Tbmr => "tbmr",
            Product::Clone => "clone",
        }
    }

    /// Uppercase code used by catalog entries and licmgr's `-p` flag.
    pub fn code(&self) -> &'static str {
        match self {
            Product::Abmr => "ABMR",
            Product::Cbmr => "CBMR",
            Product::Cobmr => "COBMR",
            Product::Tbmr => "TBMR",
            Product::Clone => "CLONE",
        }
    }

    /// Name as Cristie writes it.
    pub fn display_name(&self) -> &'static str {
        match self {
            Product::Abmr => "ABMR",
            Product::Cbmr => "CBMR",
            Product::Cobmr => "CoBMR",
            Product::Tbmr => "TBMR",
            Product::Clone => "clone",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Product {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|p| p.catalog_key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("value of product must be one of: abmr, cbmr, cobmr, tbmr, clone, got: {s}")
            })
    }
}

impl TryFrom<String> for Product {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Product> for String {
    fn from(value: Product) -> Self {
        value.display_name().to_string()
    }
}

/// Target operating system of an installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "AIX")]
    Aix,
    Linux,
    Solaris,
    Windows,
}

impl Platform {
    /// Name as it appears in catalog entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Aix => "AIX",
            Platform::Linux => "Linux",
            Platform::Solaris => "Solaris",
            Platform::Windows => "Windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Installer package type, matched as a substring of the download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    #[serde(rename = "deb")]
    Deb,
    #[serde(rename = "exe")]
    Exe,
    #[serde(rename = "rpm")]
    Rpm,
    #[serde(rename = "tar.gz")]
    TarGz,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Deb => "deb",
            PackageType::Exe => "exe",
            PackageType::Rpm => "rpm",
            PackageType::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_parses_case_insensitively() {
        assert_eq!("cbmr".parse::<Product>().unwrap(), Product::Cbmr);
        assert_eq!("CBMR".parse::<Product>().unwrap(), Product::Cbmr);
        assert_eq!("CoBMR".parse::<Product>().unwrap(), Product::Cobmr);
        assert_eq!("clone".parse::<Product>().unwrap(), Product::Clone);
        assert!("bmr".parse::<Product>().is_err());
    }

    #[test]
    fn product_codes() {
        assert_eq!(Product::Cobmr.catalog_key(), "cobmr");
        assert_eq!(Product::Cobmr.code(), "COBMR");
        assert_eq!(Product::Cobmr.to_string(), "CoBMR");
        assert_eq!(Product::Clone.code(), "CLONE");
    }

    #[test]
    fn choices_deserialize_from_json() {
        let product: Product = serde_json::from_str(r#""TBMR""#).unwrap();
        let platform: Platform = serde_json::from_str(r#""AIX""#).unwrap();
        let package: PackageType = serde_json::from_str(r#""tar.gz""#).unwrap();

        assert_eq!(product, Product::Tbmr);
        assert_eq!(platform, Platform::Aix);
        assert_eq!(package, PackageType::TarGz);

        assert!(serde_json::from_str::<Platform>(r#""linux""#).is_err());
        assert!(serde_json::from_str::<PackageType>(r#""zip""#).is_err());
    }

    #[test]
    fn product_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Product::Cobmr).unwrap(), r#""CoBMR""#);
    }
}
