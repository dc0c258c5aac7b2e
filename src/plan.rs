// src/plan.rs

//! Install plan construction
//!
//! APT and zypper handle upgrades and downgrades through their pinned
//! install syntax, so only YUM needs an explicit operation decision.

use crate::error::Result;
use crate::packages::{ResolvedPackage, TransactionProbe};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Package manager verb for the final transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Install,
    Upgrade,
    Downgrade,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::Downgrade => "downgrade",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the final transaction needs; consumed once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    pub operation: Operation,
    pub packages: Vec<ResolvedPackage>,
    pub containerd: ResolvedPackage,
}

/// Decide whether installing `main` is an install, upgrade or downgrade
///
/// When the exact version is already installed neither dry run succeeds and
/// the plan falls back to `Install`, which the manager treats as a no-op.
pub fn plan_operation(probe: &dyn TransactionProbe, main: &ResolvedPackage) -> Result<Operation> {
    if !probe.is_installed(&main.name)? {
        debug!("{} is not installed", main.name);
        return Ok(Operation::Install);
    }

    let Some(version) = &main.version else {
        return Ok(Operation::Upgrade);
    };

    let spec = format!("{}-{}", main.name, version);
    if probe.dry_run(Operation::Upgrade, &spec)? {
        return Ok(Operation::Upgrade);
    }
    if probe.dry_run(Operation::Downgrade, &spec)? {
        return Ok(Operation::Downgrade);
    }

    warn!("{} appears to be installed already; reinstalling with 'install'", spec);
    Ok(Operation::Install)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::MAIN_PACKAGE;
    use std::cell::RefCell;

    struct FakeProbe {
        installed: bool,
        upgrade: bool,
        downgrade: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeProbe {
        fn new(installed: bool, upgrade: bool, downgrade: bool) -> Self {
            Self {
                installed,
                upgrade,
                downgrade,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TransactionProbe for FakeProbe {
        fn is_installed(&self, _package: &str) -> Result<bool> {
            Ok(self.installed)
        }

        fn dry_run(&self, operation: Operation, spec: &str) -> Result<bool> {
            self.calls.borrow_mut().push(format!("{} {}", operation, spec));
            Ok(match operation {
                Operation::Upgrade => self.upgrade,
                Operation::Downgrade => self.downgrade,
                Operation::Install => false,
            })
        }
    }

    fn main_package() -> ResolvedPackage {
        ResolvedPackage::pinned(MAIN_PACKAGE, "20.10.12-3.el8")
    }

    #[test]
    fn test_not_installed_is_install() {
        let probe = FakeProbe::new(false, true, true);
        assert_eq!(plan_operation(&probe, &main_package()).unwrap(), Operation::Install);
        assert!(probe.calls.borrow().is_empty());
    }

    #[test]
    fn test_upgrade_possible() {
        let probe = FakeProbe::new(true, true, false);
        assert_eq!(plan_operation(&probe, &main_package()).unwrap(), Operation::Upgrade);
        assert_eq!(
            probe.calls.borrow().as_slice(),
            ["upgrade docker-ee-20.10.12-3.el8"]
        );
    }

    #[test]
    fn test_downgrade_when_upgrade_refused() {
        let probe = FakeProbe::new(true, false, true);
        assert_eq!(
            plan_operation(&probe, &main_package()).unwrap(),
            Operation::Downgrade
        );
        assert_eq!(probe.calls.borrow().len(), 2);
    }

    #[test]
    fn test_same_version_falls_back_to_install() {
        let probe = FakeProbe::new(true, false, false);
        assert_eq!(plan_operation(&probe, &main_package()).unwrap(), Operation::Install);
    }

    #[test]
    fn test_latest_on_installed_host_upgrades() {
        let probe = FakeProbe::new(true, false, false);
        let main = ResolvedPackage::latest(MAIN_PACKAGE);
        assert_eq!(plan_operation(&probe, &main).unwrap(), Operation::Upgrade);
        assert!(probe.calls.borrow().is_empty());
    }
}
