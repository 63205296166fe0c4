//! Ansible binary modules for Cristie products.
//!
//! Three executables are built from this crate:
//!
//! - `cristie_info` - echoes its arguments as metadata.
//! - `cristie_download` - logs in to the Cristie portal and downloads the
//!   installer matching a product, platform and package type.
//! - `cristie_license` - licenses an installed product through the local
//!   `licmgr` executable, online or offline.
//!
//! Each one reads a JSON arguments file and prints a single JSON result, see
//! [`module`].

// Core modules
pub mod config;
pub mod credentials;
pub mod errors;
pub mod logging;
pub mod module;
pub mod product;
pub mod validation;

// Module implementations
pub mod info;
pub mod licmgr;
pub mod portal;
