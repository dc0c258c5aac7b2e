// src/version/pattern.rs

//! Target version to package-listing search pattern
//!
//! Each package manager spells the same release differently: APT versions
//! look like `5:20.10.12~3-0~ubuntu-focal`, RPM releases like
//! `20.10.12-3.el8`, and zypper prints its version inside a `|` separated
//! table. The pattern compiled here is matched against raw listing lines.

use super::TargetVersion;
use crate::backend::Backend;
use crate::error::Result;
use regex::Regex;
use std::fmt;

/// Edition infix as the operator writes it
const EDITION_MARKER: &str = "-ee-";

/// A compiled, backend-specific listing filter
#[derive(Debug, Clone)]
pub struct PackagePattern {
    source: String,
    regex: Regex,
}

impl PackagePattern {
    /// Compile a concrete version string for `backend`
    pub fn new(version: &str, backend: Backend) -> Result<Self> {
        let source = pattern_source(version, backend);
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }

    /// Compile the operator's target, or `None` when latest was requested
    pub fn compile(version: &TargetVersion, backend: Backend) -> Result<Option<Self>> {
        version.as_deref().map(|v| Self::new(v, backend)).transpose()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn pattern_source(version: &str, backend: Backend) -> String {
    let (edition, suffix) = match backend {
        Backend::Apt => ("~ee~", ".*-0~ubuntu"),
        Backend::Yum => (r"\.ee\.", ".*el"),
        Backend::Zypper => (r"\.ee\.", r"[^|]*\|"),
    };

    let core = version
        .split(EDITION_MARKER)
        .map(|part| part.split('-').map(escape_literal).collect::<Vec<_>>().join(".*"))
        .collect::<Vec<_>>()
        .join(edition);
    format!("{}{}", core, suffix)
}

/// Escape regex syntax, keeping `.` as a single-character wildcard
fn escape_literal(segment: &str) -> String {
    segment
        .split('.')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".")
}
