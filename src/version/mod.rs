// src/version/mod.rs

//! Calendar versions and the operator's target version
//!
//! Docker EE releases use `YY.MM[.PATCH]` numbering, optionally followed by
//! a pre-release or edition suffix (`20.10.12-ee-1`, `23.0.1-rc2`). Only the
//! numeric prefix takes part in comparisons.

pub mod pattern;

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Oldest release that ships the rootless-extras package
pub const MIN_ROOTLESS_VER: CalendarVersion = CalendarVersion {
    year: 20,
    month: 10,
    patch: 12,
};

/// A parsed `YY.MM[.PATCH]` version
///
/// Field order matters: the derived `Ord` compares year, then month, then
/// patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarVersion {
    pub year: u32,
    pub month: u32,
    pub patch: u32,
}

impl CalendarVersion {
    pub fn new(year: u32, month: u32, patch: u32) -> Self {
        Self { year, month, patch }
    }
}

impl FromStr for CalendarVersion {
    type Err = Error;

    /// Parse the numeric prefix of a version string
    ///
    /// Everything after the first `-` is discarded. Year and month must be
    /// integers; the patch is read best-effort from its leading digits and
    /// defaults to 0.
    fn from_str(s: &str) -> Result<Self> {
        let release = s.split('-').next().unwrap_or_default();
        let mut parts = release.split('.');

        let year = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| Error::InvalidVersion(format!("'{}' has no numeric year", s)))?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| Error::InvalidVersion(format!("'{}' has no numeric month", s)))?;
        let patch = parts.next().map(leading_number).unwrap_or(0);

        Ok(Self { year, month, patch })
    }
}

impl fmt::Display for CalendarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}.{}", self.year, self.month, self.patch)
    }
}

fn leading_number(segment: &str) -> u32 {
    let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// The release the operator asked for; `None` means latest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetVersion(Option<String>);

impl TargetVersion {
    /// Request whatever the repository considers newest
    pub fn latest() -> Self {
        Self(None)
    }

    /// Build from an optional raw value; blank strings mean latest
    pub fn from_option(raw: Option<String>) -> Self {
        Self(
            raw.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        )
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_latest(&self) -> bool {
        self.0.is_none()
    }

    /// Reject a pinned target whose year or month is not numeric
    pub fn validate(&self) -> Result<()> {
        if let Some(raw) = &self.0 {
            raw.parse::<CalendarVersion>()?;
        }
        Ok(())
    }

    /// Whether the target satisfies a minimum release
    ///
    /// An unset target always does, since latest is assumed to be newer than
    /// any threshold we gate on.
    pub fn is_at_least(&self, threshold: &CalendarVersion) -> Result<bool> {
        match &self.0 {
            None => Ok(true),
            Some(raw) => Ok(raw.parse::<CalendarVersion>()? >= *threshold),
        }
    }
}

impl From<&str> for TargetVersion {
    fn from(raw: &str) -> Self {
        Self::from_option(Some(raw.to_string()))
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "latest"),
        }
    }
}
