// src/repository/keys.rs

//! Repository signing keys
//!
//! Keys are downloaded by the installer and checked to be a well-formed
//! OpenPGP certificate before being handed to `apt-key` or `rpm --import`.

use crate::error::{Error, Result};
use sequoia_openpgp::Cert;
use sequoia_openpgp::parse::Parse;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// A validated signing key and its raw (usually armored) bytes
#[derive(Debug, Clone)]
pub struct SigningKey {
    pub fingerprint: String,
    pub data: Vec<u8>,
}

impl SigningKey {
    /// Validate `data` as an OpenPGP certificate
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let cert = Cert::from_bytes(&data).map_err(|e| Error::SigningKey(e.to_string()))?;
        let fingerprint = cert.fingerprint().to_hex();
        debug!("Parsed signing key {}", fingerprint);
        Ok(Self { fingerprint, data })
    }

    /// Write the key to a temporary file for the import command
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn write_temp(&self) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("docker-ee-")
            .suffix(".gpg")
            .tempfile()?;
        file.write_all(&self.data)?;
        file.flush()?;
        Ok(file)
    }
}
