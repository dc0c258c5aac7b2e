// src/backend/apt.rs

//! APT backend (Ubuntu)

use super::{Backend, BackendContext, PackageBackend};
use crate::error::{Error, Result};
use crate::packages::{ListOrder, PackageQuery, PackageRow};
use crate::plan::InstallPlan;
use crate::repository::{self, RepositoryProbe};
use crate::system::CommandLine;
use tracing::{debug, info};

const PREREQUISITES: &[&str] = &[
    "apt-transport-https",
    "ca-certificates",
    "software-properties-common",
];

/// Present at the root of every APT repository we publish
const MANIFEST: &str = "gpg";

/// Releases whose apt predates `--allow-downgrades` (apt 1.1)
const LEGACY_APT_RELEASES: &[&str] = &["trusty"];

pub struct AptBackend<'a> {
    ctx: BackendContext<'a>,
}

impl<'a> AptBackend<'a> {
    pub fn new(ctx: BackendContext<'a>) -> Self {
        Self { ctx }
    }

    fn apt_get(&self) -> CommandLine {
        CommandLine::new("apt-get").elevated()
    }

    fn update(&self) -> Result<()> {
        self.ctx.runner.run(&self.apt_get().args(["update", "-qq"]))
    }

    /// Flag letting a pinned install move to an older version
    fn downgrade_flag(&self) -> &'static str {
        match self.ctx.target.codename {
            Some(codename) if LEGACY_APT_RELEASES.contains(&codename) => "--force-yes",
            _ => "--allow-downgrades",
        }
    }

    fn architecture(&self) -> Result<String> {
        let cmd = CommandLine::new("dpkg").arg("--print-architecture");
        let output = self.ctx.runner.capture(&cmd)?;
        if !output.success {
            return Err(Error::CommandFailed {
                command: cmd.to_string(),
                status: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

/// Parse `apt-cache madison` output
///
/// Lines look like
/// ` docker-ee | 5:20.10.12~3-0~ubuntu-focal | https://... focal/test amd64 Packages`.
pub fn parse_madison(output: &str) -> Vec<PackageRow> {
    output
        .lines()
        .filter_map(|line| {
            let mut cols = line.split('|').map(str::trim);
            let name = cols.next().filter(|n| !n.is_empty())?;
            let version = cols.next().filter(|v| !v.is_empty())?;
            Some(PackageRow {
                name: name.to_string(),
                version: version.to_string(),
                raw: line.to_string(),
            })
        })
        .collect()
}

impl PackageQuery for AptBackend<'_> {
    fn search_command(&self, package: &str) -> String {
        format!("apt-cache madison '{}'", package)
    }

    fn list_versions(&self, package: &str) -> Result<Vec<PackageRow>> {
        let cmd = CommandLine::new("apt-cache").args(["madison", package]);
        let output = self.ctx.runner.capture(&cmd)?;
        if !output.success {
            return Err(Error::CommandFailed {
                command: cmd.to_string(),
                status: output.stderr.trim().to_string(),
            });
        }
        Ok(parse_madison(&output.stdout))
    }

    fn list_order(&self) -> ListOrder {
        self.backend().list_order()
    }
}

impl PackageBackend for AptBackend<'_> {
    fn backend(&self) -> Backend {
        Backend::Apt
    }

    fn install_prerequisites(&self) -> Result<()> {
        self.update()?;
        self.ctx
            .runner
            .run(&self.apt_get().args(["install", "-y", "-qq"]).args(PREREQUISITES.iter().copied()))
    }

    fn register_repository(&self, probe: &dyn RepositoryProbe) -> Result<()> {
        let config = self.ctx.config;
        let target = self.ctx.target;

        let url = repository::resolve_repository_url(probe, &config.docker_url, MANIFEST, &target.repo_name)?;
        self.ctx.import_key(
            probe,
            &repository::join_url(&url, MANIFEST),
            CommandLine::new("apt-key").arg("add"),
        )?;

        let codename = target.codename.ok_or_else(|| Error::UnsupportedDistribution {
            id: target.id.clone(),
            version: target.version.clone(),
        })?;
        let source = format!(
            "deb [arch={}] {} {} {}",
            self.architecture()?,
            url,
            codename,
            config.channel
        );
        info!("Adding APT source: {}", source);

        self.ctx.runner.run(
            &CommandLine::new("add-apt-repository")
                .args(["-y", source.as_str()])
                .elevated(),
        )?;
        self.update()
    }

    fn install(&self, plan: &InstallPlan) -> Result<()> {
        let mut args: Vec<String> = plan
            .packages
            .iter()
            .map(|pkg| BackendContext::package_arg(pkg, '='))
            .collect();
        args.push(BackendContext::package_arg(&plan.containerd, '='));
        debug!("APT install arguments: {:?}", args);

        self.ctx.runner.run(
            &self
                .apt_get()
                .args(["install", "-y", "-qq", "--no-install-recommends"])
                .arg(self.downgrade_flag())
                .args(args),
        )
    }
}
