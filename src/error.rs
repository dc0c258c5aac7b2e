// src/error.rs

use thiserror::Error;

/// Core error types for the installer
#[derive(Error, Debug)]
pub enum Error {
    /// Required input missing or unusable
    #[error("{0}")]
    Configuration(String),

    /// Distro/version pair not in the support table
    #[error("unsupported distribution '{id}' version '{version}'; this installer only supports Ubuntu, CentOS, RHEL, Rocky, AlmaLinux, Amazon Linux 2, Oracle Linux, SLES and openSUSE Leap")]
    UnsupportedDistribution { id: String, version: String },

    /// Main package has no candidate for the requested version
    #[error("'{version}' not found amongst package listing results; searched with: {query}")]
    VersionNotFound { version: String, query: String },

    /// No root, sudo or su available
    #[error("{0}")]
    Privilege(String),

    /// TargetVersion is not a calendar version
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Compiled search pattern is not a valid regex
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// External command exited non-zero
    #[error("command '{command}' failed with {status}")]
    CommandFailed { command: String, status: String },

    /// Repository probe or key download failed
    #[error("Download error: {0}")]
    Download(String),

    /// Signing key could not be parsed
    #[error("Invalid signing key: {0}")]
    SigningKey(String),

    /// os-release could not be read or lacks an ID
    #[error("Failed to detect distribution: {0}")]
    OsRelease(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the installer's Error type
pub type Result<T> = std::result::Result<T, Error>;
