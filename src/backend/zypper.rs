// src/backend/zypper.rs

//! Zypper backend (SLES, openSUSE Leap)

use super::{Backend, BackendContext, PackageBackend};
use crate::error::{Error, Result};
use crate::packages::{ListOrder, PackageQuery, PackageRow};
use crate::plan::InstallPlan;
use crate::repository::{self, RepositoryProbe};
use crate::system::CommandLine;
use tracing::{debug, info};

const PREREQUISITES: &[&str] = &["ca-certificates"];

const MANIFEST: &str = "gpg";

pub struct ZypperBackend<'a> {
    ctx: BackendContext<'a>,
}

impl<'a> ZypperBackend<'a> {
    pub fn new(ctx: BackendContext<'a>) -> Self {
        Self { ctx }
    }

    fn zypper(&self) -> CommandLine {
        CommandLine::new("zypper").arg("--non-interactive").elevated()
    }

    fn alias(&self) -> String {
        format!("docker-ee-{}", self.ctx.config.channel)
    }
}

/// Parse `zypper search -s` output
///
/// Rows are `S | Name | Type | Version | Arch | Repository`; the header and
/// the `--+--` rule are skipped.
pub fn parse_zypper_search(output: &str) -> Vec<PackageRow> {
    output
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('|').map(str::trim).collect();
            let [_status, name, kind, version, ..] = cols.as_slice() else {
                return None;
            };
            if *kind != "package" || name.is_empty() || version.is_empty() {
                return None;
            }
            Some(PackageRow {
                name: name.to_string(),
                version: version.to_string(),
                raw: line.to_string(),
            })
        })
        .collect()
}

impl PackageQuery for ZypperBackend<'_> {
    fn search_command(&self, package: &str) -> String {
        format!("zypper search -s --match-exact '{}'", package)
    }

    fn list_versions(&self, package: &str) -> Result<Vec<PackageRow>> {
        let cmd = CommandLine::new("zypper").args([
            "--non-interactive",
            "search",
            "-s",
            "--match-exact",
            package,
        ]);
        let output = self.ctx.runner.capture(&cmd)?;
        if !output.success {
            // 104: no matches
            debug!("{} listed nothing: {}", cmd, output.combined().trim());
            return Ok(Vec::new());
        }
        Ok(parse_zypper_search(&output.stdout))
    }

    fn list_order(&self) -> ListOrder {
        self.backend().list_order()
    }
}

impl PackageBackend for ZypperBackend<'_> {
    fn backend(&self) -> Backend {
        Backend::Zypper
    }

    fn install_prerequisites(&self) -> Result<()> {
        self.ctx
            .runner
            .run(&self.zypper().arg("install").args(PREREQUISITES.iter().copied()))
    }

    fn register_repository(&self, probe: &dyn RepositoryProbe) -> Result<()> {
        let config = self.ctx.config;
        let target = self.ctx.target;

        let url = repository::resolve_repository_url(probe, &config.docker_url, MANIFEST, &target.repo_name)?;
        self.ctx.import_key(
            probe,
            &repository::join_url(&url, MANIFEST),
            CommandLine::new("rpm").arg("--import"),
        )?;

        let alias = self.alias();
        let repo_url = repository::join_url(
            &url,
            &format!("{}/{}/{}", target.version, std::env::consts::ARCH, config.channel),
        );

        // Replace any earlier definition under the same alias
        match self.ctx.runner.run(&self.zypper().args(["removerepo", alias.as_str()])) {
            Ok(()) | Err(Error::CommandFailed { .. }) => {}
            Err(e) => return Err(e),
        }

        info!("Adding zypper repository {} as {}", repo_url, alias);
        self.ctx
            .runner
            .run(&self.zypper().args(["addrepo", repo_url.as_str(), alias.as_str()]))?;
        self.ctx.runner.run(&self.zypper().arg("refresh"))
    }

    fn install(&self, plan: &InstallPlan) -> Result<()> {
        let mut args: Vec<String> = plan
            .packages
            .iter()
            .map(|pkg| BackendContext::package_arg(pkg, '-'))
            .collect();
        args.push(BackendContext::package_arg(&plan.containerd, '='));
        debug!("zypper install arguments: {:?}", args);

        self.ctx
            .runner
            .run(&self.zypper().args(["install", "--oldpackage"]).args(args))
    }
}
