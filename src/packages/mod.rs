// src/packages/mod.rs

//! Docker EE package set and version resolution
//!
//! Three logical packages are resolved against the vendor repository (the
//! engine, its CLI and the rootless extras); containerd rides along as a
//! fixed dependency. Backends implement [`PackageQuery`] so the resolver
//! never talks to a package manager directly.

pub mod resolver;
pub mod traits;

pub use resolver::{PackageSet, Resolver};
pub use traits::{ListOrder, PackageQuery, PackageRow, TransactionProbe};

use serde::Serialize;

/// Engine package
pub const MAIN_PACKAGE: &str = "docker-ee";

/// Command line client
pub const CLI_PACKAGE: &str = "docker-ee-cli";

/// Optional rootless mode support
pub const ROOTLESS_PACKAGE: &str = "docker-ee-rootless-extras";

/// Container runtime dependency
pub const CONTAINERD_PACKAGE: &str = "containerd.io";

/// A package name with the version it should be pinned to
///
/// `version` is `None` when the package manager is left to pick the newest
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: Option<String>,
}

impl ResolvedPackage {
    pub fn pinned(name: &str, version: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.into()),
        }
    }

    pub fn latest(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }
}
