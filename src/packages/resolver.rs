// src/packages/resolver.rs

//! Picks one concrete version per package from a backend listing

use super::traits::{ListOrder, PackageQuery, PackageRow};
use super::{CLI_PACKAGE, MAIN_PACKAGE, ROOTLESS_PACKAGE, ResolvedPackage};
use crate::error::{Error, Result};
use crate::version::pattern::PackagePattern;
use crate::version::{MIN_ROOTLESS_VER, TargetVersion};
use tracing::{debug, info};

/// Resolution result; absent cli/rootless entries are left out of the install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet {
    pub main: ResolvedPackage,
    pub cli: Option<ResolvedPackage>,
    pub rootless: Option<ResolvedPackage>,
}

impl PackageSet {
    /// Packages in install order
    pub fn into_packages(self) -> Vec<ResolvedPackage> {
        std::iter::once(self.main)
            .chain(self.cli)
            .chain(self.rootless)
            .collect()
    }
}

pub struct Resolver<'a> {
    query: &'a dyn PackageQuery,
}

impl<'a> Resolver<'a> {
    pub fn new(query: &'a dyn PackageQuery) -> Self {
        Self { query }
    }

    /// Resolve the engine, cli and rootless packages for `target`
    ///
    /// `pattern` must be the compiled form of `target`; it is `None` exactly
    /// when latest was requested, in which case nothing is pinned.
    /// `ships_rootless` is false for distro/repository combinations that
    /// never carry the rootless package.
    pub fn resolve(
        &self,
        target: &TargetVersion,
        pattern: Option<&PackagePattern>,
        ships_rootless: bool,
    ) -> Result<PackageSet> {
        let want_rootless = ships_rootless && target.is_at_least(&MIN_ROOTLESS_VER)?;
        if !want_rootless {
            debug!("Skipping {} for version {}", ROOTLESS_PACKAGE, target);
        }

        let Some(pattern) = pattern else {
            let rootless = if want_rootless && self.is_available(ROOTLESS_PACKAGE)? {
                Some(ResolvedPackage::latest(ROOTLESS_PACKAGE))
            } else {
                None
            };
            return Ok(PackageSet {
                main: ResolvedPackage::latest(MAIN_PACKAGE),
                cli: Some(ResolvedPackage::latest(CLI_PACKAGE)),
                rootless,
            });
        };

        info!("Searching repository for VERSION '{}'", target);
        info!("{}", self.describe_search(MAIN_PACKAGE, pattern));

        let main = self
            .select(MAIN_PACKAGE, pattern)?
            .ok_or_else(|| Error::VersionNotFound {
                version: target.to_string(),
                query: self.describe_search(MAIN_PACKAGE, pattern),
            })?;

        let cli = self.select(CLI_PACKAGE, pattern)?;
        if cli.is_none() {
            debug!("No {} candidate matches {}", CLI_PACKAGE, pattern);
        }

        let rootless = if want_rootless {
            self.select(ROOTLESS_PACKAGE, pattern)?
        } else {
            None
        };

        Ok(PackageSet {
            main,
            cli,
            rootless,
        })
    }

    /// Newest matching version of `package`, in the backend's list order
    fn select(&self, package: &str, pattern: &PackagePattern) -> Result<Option<ResolvedPackage>> {
        let rows = self.query.list_versions(package)?;
        let mut matches = rows.iter().filter(|row| pattern.is_match(&row.raw));

        let chosen: Option<&PackageRow> = match self.query.list_order() {
            ListOrder::NewestFirst => matches.next(),
            ListOrder::OldestFirst => matches.last(),
        };

        Ok(chosen.map(|row| {
            debug!("Selected {} {}", package, row.version);
            ResolvedPackage::pinned(package, row.version.clone())
        }))
    }

    fn is_available(&self, package: &str) -> Result<bool> {
        Ok(!self.query.list_versions(package)?.is_empty())
    }

    /// Shell pipeline equivalent to the search, for manual diagnosis
    fn describe_search(&self, package: &str, pattern: &PackagePattern) -> String {
        let pick = match self.query.list_order() {
            ListOrder::NewestFirst => "head -1",
            ListOrder::OldestFirst => "tail -1",
        };
        format!(
            "{} | grep '{}' | {}",
            self.query.search_command(package),
            pattern,
            pick
        )
    }
}
