// src/distro.rs

//! Host distribution detection and the support table

use crate::backend::Backend;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Ubuntu releases with a Docker EE repository, by VERSION_ID
const UBUNTU_RELEASES: &[(&str, &str)] = &[
    ("14.04", "trusty"),
    ("16.04", "xenial"),
    ("18.04", "bionic"),
    ("20.04", "focal"),
    ("22.04", "jammy"),
];

/// `ID` and `VERSION_ID` from os-release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
}

impl OsRelease {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::OsRelease(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut id = None;
        let mut version_id = String::new();

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("ID=") {
                id = Some(unquote(val).to_lowercase());
            } else if let Some(val) = line.strip_prefix("VERSION_ID=") {
                version_id = unquote(val).to_string();
            }
        }

        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::OsRelease("os-release has no ID".to_string()))?;

        debug!("Detected distribution {} {}", id, version_id);
        Ok(Self { id, version_id })
    }
}

fn unquote(val: &str) -> &str {
    val.trim().trim_matches('"').trim_matches('\'')
}

/// A supported distro mapped onto its backend and repository layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroTarget {
    /// os-release ID
    pub id: String,
    pub backend: Backend,
    /// Repository subdirectory (`ubuntu`, `centos`, `amazonlinux`, `sles`, ...)
    pub repo_name: String,
    /// Version as used in repository paths; major only for RPM distros
    pub version: String,
    /// Ubuntu release codename
    pub codename: Option<&'static str>,
}

impl DistroTarget {
    /// Look `id`/`version` up in the support table
    pub fn resolve(id: &str, version: &str) -> Result<Self> {
        let major = version.split('.').next().unwrap_or(version);
        let unsupported = || Error::UnsupportedDistribution {
            id: id.to_string(),
            version: version.to_string(),
        };

        let (backend, repo_name, version, codename) = match id {
            "ubuntu" => {
                let (_, codename) = UBUNTU_RELEASES
                    .iter()
                    .find(|(release, _)| *release == version)
                    .ok_or_else(unsupported)?;
                (Backend::Apt, "ubuntu", version, Some(*codename))
            }
            "centos" | "rhel" | "rocky" | "almalinux" if !major.is_empty() => {
                (Backend::Yum, id, major, None)
            }
            "amzn" if version == "2" => (Backend::Yum, "amazonlinux", major, None),
            "ol" if !major.is_empty() => (Backend::Yum, "oraclelinux", major, None),
            "sles" if major == "12" || major == "15" => (Backend::Zypper, "sles", major, None),
            "opensuse-leap" if major == "15" => (Backend::Zypper, "sles", major, None),
            _ => return Err(unsupported()),
        };

        Ok(Self {
            id: id.to_string(),
            backend,
            repo_name: repo_name.to_string(),
            version: version.to_string(),
            codename,
        })
    }

    /// Whether this distro's repository carries the rootless-extras package
    ///
    /// The SLES 12 repository never has.
    pub fn ships_rootless(&self) -> bool {
        !(self.id == "sles" && self.version == "12")
    }
}

impl TryFrom<&OsRelease> for DistroTarget {
    type Error = Error;

    fn try_from(release: &OsRelease) -> Result<Self> {
        Self::resolve(&release.id, &release.version_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_release() {
        let content = r#"NAME="Rocky Linux"
VERSION="8.9 (Green Obsidian)"
ID="rocky"
ID_LIKE="rhel centos fedora"
VERSION_ID="8.9"
"#;
        let release = OsRelease::parse(content).unwrap();
        assert_eq!(release.id, "rocky");
        assert_eq!(release.version_id, "8.9");
    }

    #[test]
    fn test_parse_os_release_without_id() {
        assert!(matches!(
            OsRelease::parse("NAME=Mystery\n"),
            Err(Error::OsRelease(_))
        ));
    }

    #[test]
    fn test_load_os_release_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "ID=ubuntu\nVERSION_ID=\"22.04\"\n").unwrap();

        let release = OsRelease::load(file.path()).unwrap();
        assert_eq!(
            release,
            OsRelease {
                id: "ubuntu".to_string(),
                version_id: "22.04".to_string()
            }
        );
    }

    #[test]
    fn test_ubuntu_releases() {
        let target = DistroTarget::resolve("ubuntu", "20.04").unwrap();
        assert_eq!(target.backend, Backend::Apt);
        assert_eq!(target.codename, Some("focal"));
        assert_eq!(target.repo_name, "ubuntu");

        assert!(DistroTarget::resolve("ubuntu", "24.04").is_err());
        assert!(DistroTarget::resolve("ubuntu", "20.10").is_err());
    }

    #[test]
    fn test_rhel_family_truncates_to_major() {
        for id in ["centos", "rhel", "rocky", "almalinux"] {
            let target = DistroTarget::resolve(id, "8.6").unwrap();
            assert_eq!(target.backend, Backend::Yum);
            assert_eq!(target.repo_name, id);
            assert_eq!(target.version, "8");
        }
    }

    #[test]
    fn test_yum_aliases() {
        let amzn = DistroTarget::resolve("amzn", "2").unwrap();
        assert_eq!(amzn.repo_name, "amazonlinux");
        assert!(DistroTarget::resolve("amzn", "2023").is_err());

        let ol = DistroTarget::resolve("ol", "7.9").unwrap();
        assert_eq!(ol.repo_name, "oraclelinux");
        assert_eq!(ol.version, "7");
    }

    #[test]
    fn test_zypper_distros() {
        let sles = DistroTarget::resolve("sles", "15.4").unwrap();
        assert_eq!(sles.backend, Backend::Zypper);
        assert_eq!(sles.version, "15");
        assert!(sles.ships_rootless());

        let sles12 = DistroTarget::resolve("sles", "12.5").unwrap();
        assert!(!sles12.ships_rootless());

        let leap = DistroTarget::resolve("opensuse-leap", "15.5").unwrap();
        assert_eq!(leap.repo_name, "sles");
        assert!(DistroTarget::resolve("opensuse-leap", "42.3").is_err());
        assert!(DistroTarget::resolve("sles", "11.4").is_err());
    }

    #[test]
    fn test_unsupported_distro() {
        let err = DistroTarget::resolve("fedora", "39").unwrap_err();
        match err {
            Error::UnsupportedDistribution { id, version } => {
                assert_eq!(id, "fedora");
                assert_eq!(version, "39");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
