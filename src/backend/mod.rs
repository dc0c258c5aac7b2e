// src/backend/mod.rs

//! Package-manager backends and the dispatcher that drives them
//!
//! Each backend (APT, YUM, zypper) implements [`PackageBackend`]; the
//! [`Dispatcher`] picks one from the distro support table and runs the same
//! sequence on it: prerequisites, repository registration, version
//! resolution, planning and the final install transaction.

pub mod apt;
pub mod yum;
pub mod zypper;

#[cfg(test)]
pub(crate) mod testing;

pub use apt::AptBackend;
pub use yum::YumBackend;
pub use zypper::ZypperBackend;

use crate::config::InstallerConfig;
use crate::distro::{DistroTarget, OsRelease};
use crate::error::Result;
use crate::packages::{ListOrder, PackageQuery, ResolvedPackage, Resolver};
use crate::plan::{InstallPlan, Operation};
use crate::repository::RepositoryProbe;
use crate::system::{CommandLine, CommandRunner};
use crate::version::TargetVersion;
use crate::version::pattern::PackagePattern;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Supported native package-manager families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Apt,
    Yum,
    Zypper,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
        }
    }

    /// Order in which the manager lists duplicate versions
    pub fn list_order(&self) -> ListOrder {
        match self {
            Self::Apt => ListOrder::NewestFirst,
            Self::Yum | Self::Zypper => ListOrder::OldestFirst,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One package manager's implementation of the install sequence
pub trait PackageBackend: PackageQuery {
    fn backend(&self) -> Backend;

    /// Install the tools repository registration depends on
    fn install_prerequisites(&self) -> Result<()>;

    /// Import the signing key and add the vendor repository
    fn register_repository(&self, probe: &dyn RepositoryProbe) -> Result<()>;

    fn compile_pattern(&self, version: &TargetVersion) -> Result<Option<PackagePattern>> {
        PackagePattern::compile(version, self.backend())
    }

    /// Pick the transaction verb; managers with pinned install syntax
    /// always install
    fn plan(&self, _main: &ResolvedPackage) -> Result<Operation> {
        Ok(Operation::Install)
    }

    /// Run the final transaction
    fn install(&self, plan: &InstallPlan) -> Result<()>;
}

/// Everything a backend needs from the run
#[derive(Clone, Copy)]
pub struct BackendContext<'a> {
    pub config: &'a InstallerConfig,
    pub target: &'a DistroTarget,
    pub runner: &'a dyn CommandRunner,
}

impl BackendContext<'_> {
    /// Install argument with an optional `<separator>version` pin
    pub(crate) fn package_arg(pkg: &ResolvedPackage, separator: char) -> String {
        match &pkg.version {
            Some(version) => format!("{}{}{}", pkg.name, separator, version),
            None => pkg.name.clone(),
        }
    }

    /// Import a downloaded signing key through `program`'s import verb
    pub(crate) fn import_key(
        &self,
        probe: &dyn RepositoryProbe,
        key_url: &str,
        import: CommandLine,
    ) -> Result<()> {
        let key = probe.fetch_key(key_url)?;
        info!("Importing signing key {}", key.fingerprint);

        let file = key.write_temp()?;
        let path = file.path().to_string_lossy().into_owned();
        self.runner.run(&import.arg(path).elevated())
    }
}

/// Selects a backend for the host and drives it through the install
pub struct Dispatcher<'a> {
    config: &'a InstallerConfig,
    runner: &'a dyn CommandRunner,
    probe: &'a dyn RepositoryProbe,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn RepositoryProbe,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
        }
    }

    /// Install Docker EE on `distro_id`/`distro_version`
    ///
    /// Returns the plan that was carried out. Unsupported distros and
    /// malformed versions fail before anything touches the host.
    pub fn dispatch(&self, distro_id: &str, distro_version: &str) -> Result<InstallPlan> {
        let target = DistroTarget::resolve(distro_id, distro_version)?;
        self.dispatch_to(&target)
    }

    /// Install Docker EE on the distro described by `release`
    pub fn dispatch_release(&self, release: &OsRelease) -> Result<InstallPlan> {
        let target = DistroTarget::try_from(release)?;
        self.dispatch_to(&target)
    }

    fn dispatch_to(&self, target: &DistroTarget) -> Result<InstallPlan> {
        self.config.version.validate()?;
        info!(
            "Installing Docker EE {} on {} {} using {}",
            self.config.version, target.id, target.version, target.backend
        );

        let ctx = BackendContext {
            config: self.config,
            target,
            runner: self.runner,
        };

        match target.backend {
            Backend::Apt => self.drive(&AptBackend::new(ctx), target),
            Backend::Yum => self.drive(&YumBackend::new(ctx), target),
            Backend::Zypper => self.drive(&ZypperBackend::new(ctx), target),
        }
    }

    fn drive(&self, backend: &dyn PackageBackend, target: &DistroTarget) -> Result<InstallPlan> {
        backend.install_prerequisites()?;
        backend.register_repository(self.probe)?;

        let version = &self.config.version;
        let pattern = backend.compile_pattern(version)?;
        if let Some(pattern) = &pattern {
            debug!("Compiled {} search pattern {}", backend.backend(), pattern);
        }

        let packages =
            Resolver::new(backend).resolve(version, pattern.as_ref(), target.ships_rootless())?;
        let operation = backend.plan(&packages.main)?;

        let plan = InstallPlan {
            operation,
            packages: packages.into_packages(),
            containerd: self.config.containerd(),
        };

        info!(
            "Running {} {} for {} package(s)",
            backend.backend(),
            plan.operation,
            plan.packages.len() + 1
        );
        backend.install(&plan)?;
        Ok(plan)
    }
}
