// src/packages/traits.rs

//! Package manager capabilities the core depends on

use crate::error::Result;
use crate::plan::Operation;

/// One line of a package manager's version listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    /// Package name as printed by the manager (architecture stripped)
    pub name: String,
    /// Version ready to be used in an install argument
    pub version: String,
    /// The unmodified listing line; search patterns match against this
    pub raw: String,
}

/// Order in which a backend prints duplicate versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// apt-cache madison
    NewestFirst,
    /// yum list --showduplicates, zypper search -s
    OldestFirst,
}

/// Read-only access to the versions a repository offers
pub trait PackageQuery {
    /// Shell spelling of the listing command, shown to the operator
    fn search_command(&self, package: &str) -> String;

    /// Every available version of `package`, duplicates included, in the
    /// manager's natural order
    fn list_versions(&self, package: &str) -> Result<Vec<PackageRow>>;

    fn list_order(&self) -> ListOrder;
}

/// Installed-state probes used by the YUM planner
pub trait TransactionProbe {
    /// Whether `package` is currently installed
    fn is_installed(&self, package: &str) -> Result<bool>;

    /// Whether the manager would carry out `operation` on `spec`
    /// (`name-version`) without actually changing the system
    fn dry_run(&self, operation: Operation, spec: &str) -> Result<bool>;
}
