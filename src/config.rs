// src/config.rs

//! Installer configuration
//!
//! Built once at startup from command-line flags and their environment
//! variable fallbacks, then passed by reference to everything that needs it.

use crate::error::{Error, Result};
use crate::packages::{CONTAINERD_PACKAGE, ResolvedPackage};
use crate::version::TargetVersion;

/// Repository channel used when `CHANNEL` is unset
pub const DEFAULT_CHANNEL: &str = "test";

/// Immutable per-run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Repository base URL, without a trailing `/`
    pub docker_url: String,
    pub version: TargetVersion,
    pub channel: String,
    /// containerd release prefix to pin, e.g. `1.6`
    pub containerd_version: Option<String>,
    /// Print mutating commands instead of running them
    pub dry_run: bool,
}

impl InstallerConfig {
    /// Validate raw inputs; blank values count as unset
    pub fn new(
        docker_url: Option<String>,
        version: Option<String>,
        channel: Option<String>,
        containerd_version: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let docker_url = non_empty(docker_url)
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                Error::Configuration("DOCKER_URL must be set to the repository base URL".to_string())
            })?;

        let version = TargetVersion::from_option(version);
        version.validate()?;

        Ok(Self {
            docker_url,
            version,
            channel: non_empty(channel).unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            containerd_version: non_empty(containerd_version),
            dry_run,
        })
    }

    /// The containerd dependency, pinned to a release prefix when requested
    pub fn containerd(&self) -> ResolvedPackage {
        match &self.containerd_version {
            Some(v) => ResolvedPackage::pinned(CONTAINERD_PACKAGE, format!("{}*", v)),
            None => ResolvedPackage::latest(CONTAINERD_PACKAGE),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
