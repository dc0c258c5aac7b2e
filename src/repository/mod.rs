// src/repository/mod.rs

//! Vendor repository discovery
//!
//! This module provides functionality for:
//! - Probing the repository base URL for a backend's manifest file
//! - Falling back to the distro-specific subdirectory when it is missing
//! - Downloading and validating repository signing keys

pub mod keys;

pub use keys::SigningKey;

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use tracing::{debug, info};

/// Network access needed to register a repository
pub trait RepositoryProbe {
    /// Whether `url` answers with a success status
    fn exists(&self, url: &str) -> Result<bool>;

    /// Download and validate the signing key at `url`
    fn fetch_key(&self, url: &str) -> Result<SigningKey>;
}

/// HTTP implementation backed by a blocking reqwest client
pub struct HttpRepository {
    client: Client,
}

impl HttpRepository {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("install-docker-ee/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl RepositoryProbe for HttpRepository {
    fn exists(&self, url: &str) -> Result<bool> {
        debug!("Probing {}", url);

        let response = self
            .client
            .head(url)
            .send()
            .map_err(|e| Error::Download(format!("Failed to reach {}: {}", url, e)))?;

        debug!("HTTP {} from {}", response.status(), url);
        Ok(response.status().is_success())
    }

    fn fetch_key(&self, url: &str) -> Result<SigningKey> {
        info!("Downloading signing key from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Download(format!("Failed to download {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Download(format!("Failed to read response: {}", e)))?;

        SigningKey::parse(bytes.to_vec())
    }
}

/// Join a URL and a relative path with exactly one `/`
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Find the repository root for a backend
///
/// `base` itself is the root when it serves `manifest`; otherwise
/// `base/suffix` is tried. Neither serving the manifest is an error.
pub fn resolve_repository_url(
    probe: &dyn RepositoryProbe,
    base: &str,
    manifest: &str,
    suffix: &str,
) -> Result<String> {
    let direct = join_url(base, manifest);
    if probe.exists(&direct)? {
        let root = base.trim_end_matches('/').to_string();
        info!("Using repository {}", root);
        return Ok(root);
    }

    let root = join_url(base, suffix);
    let nested = join_url(&root, manifest);
    if probe.exists(&nested)? {
        info!("Using repository {}", root);
        return Ok(root);
    }

    Err(Error::Download(format!(
        "no repository found: neither {} nor {} exists",
        direct, nested
    )))
}
