// src/backend/yum.rs

//! YUM/DNF backend (CentOS, RHEL, Rocky, AlmaLinux, Amazon Linux, Oracle Linux)

use super::{Backend, BackendContext, PackageBackend};
use crate::error::{Error, Result};
use crate::packages::{ListOrder, PackageQuery, PackageRow, ResolvedPackage, TransactionProbe};
use crate::plan::{self, InstallPlan, Operation};
use crate::repository::{self, RepositoryProbe};
use crate::system::CommandLine;
use tracing::{debug, info};

const PREREQUISITES: &[&str] = &["yum-utils", "device-mapper-persistent-data", "lvm2"];

/// Repository definition published next to the packages
const MANIFEST: &str = "docker-ee.repo";

/// yum variables referenced by `docker-ee.repo`
const VARS_DIR: &str = "/etc/yum/vars";

pub struct YumBackend<'a> {
    ctx: BackendContext<'a>,
}

impl<'a> YumBackend<'a> {
    pub fn new(ctx: BackendContext<'a>) -> Self {
        Self { ctx }
    }

    fn yum(&self) -> CommandLine {
        CommandLine::new("yum").elevated()
    }

    /// Write a yum variable file
    fn set_var(&self, name: &str, value: &str) -> Result<()> {
        let quoted = shlex::try_quote(value)
            .map_err(|e| Error::Configuration(format!("cannot quote {}: {}", value, e)))?;
        let script = format!("echo {} > {}/{}", quoted, VARS_DIR, name);
        self.ctx
            .runner
            .run(&CommandLine::new("sh").args(["-c", script.as_str()]).elevated())
    }
}

/// Parse `yum list --showduplicates` output
///
/// Package lines have three columns, `docker-ee.x86_64  3:20.10.12-3.el8  docker-ee-test`;
/// headers and metadata notices do not and are skipped. The epoch is dropped
/// because `name-version` install arguments cannot carry it.
pub fn parse_yum_list(output: &str) -> Vec<PackageRow> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [name_arch, version, _repo] = fields.as_slice() else {
                return None;
            };
            let (name, _arch) = name_arch.rsplit_once('.')?;
            let version = version.split_once(':').map_or(*version, |(_, v)| v);
            Some(PackageRow {
                name: name.to_string(),
                version: version.to_string(),
                raw: line.to_string(),
            })
        })
        .collect()
}

impl PackageQuery for YumBackend<'_> {
    fn search_command(&self, package: &str) -> String {
        format!("yum list --showduplicates '{}'", package)
    }

    fn list_versions(&self, package: &str) -> Result<Vec<PackageRow>> {
        let cmd = CommandLine::new("yum").args(["list", "--showduplicates", "-q", package]);
        let output = self.ctx.runner.capture(&cmd)?;
        if !output.success {
            // yum exits 1 for "No matching Packages to list"
            debug!("{} listed nothing: {}", cmd, output.stderr.trim());
            return Ok(Vec::new());
        }
        Ok(parse_yum_list(&output.stdout))
    }

    fn list_order(&self) -> ListOrder {
        self.backend().list_order()
    }
}

impl TransactionProbe for YumBackend<'_> {
    fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self
            .ctx
            .runner
            .capture(&CommandLine::new("rpm").args(["-q", package]))?;
        Ok(output.success)
    }

    fn dry_run(&self, operation: Operation, spec: &str) -> Result<bool> {
        let cmd = self
            .yum()
            .args(["--setopt=tsflags=test", "-y", "-q", operation.as_str(), spec]);
        let output = self.ctx.runner.capture(&cmd)?;
        let applicable = output.success && !output.combined().contains("Nothing to do");
        debug!("Dry-run {} {}: {}", operation, spec, applicable);
        Ok(applicable)
    }
}

impl PackageBackend for YumBackend<'_> {
    fn backend(&self) -> Backend {
        Backend::Yum
    }

    fn install_prerequisites(&self) -> Result<()> {
        self.ctx
            .runner
            .run(&self.yum().args(["install", "-y", "-q"]).args(PREREQUISITES.iter().copied()))
    }

    fn register_repository(&self, probe: &dyn RepositoryProbe) -> Result<()> {
        let config = self.ctx.config;
        let target = self.ctx.target;

        let url = repository::resolve_repository_url(probe, &config.docker_url, MANIFEST, &target.repo_name)?;
        self.ctx.import_key(
            probe,
            &repository::join_url(&url, "gpg"),
            CommandLine::new("rpm").arg("--import"),
        )?;

        self.set_var("dockerurl", &url)?;
        self.set_var("dockerosversion", &target.version)?;

        let repo_file = repository::join_url(&url, MANIFEST);
        info!("Adding YUM repository {}", repo_file);
        let config_manager = CommandLine::new("yum-config-manager").elevated();
        self.ctx
            .runner
            .run(&config_manager.clone().args(["--add-repo", repo_file.as_str()]))?;
        self.ctx
            .runner
            .run(&config_manager.args(["--enable".to_string(), format!("docker-ee-{}", config.channel)]))?;

        self.ctx.runner.run(&self.yum().args(["makecache", "-q"]))
    }

    fn plan(&self, main: &ResolvedPackage) -> Result<Operation> {
        plan::plan_operation(self, main)
    }

    fn install(&self, plan: &InstallPlan) -> Result<()> {
        let mut args: Vec<String> = plan
            .packages
            .iter()
            .map(|pkg| BackendContext::package_arg(pkg, '-'))
            .collect();
        args.push(BackendContext::package_arg(&plan.containerd, '-'));
        debug!("YUM {} arguments: {:?}", plan.operation, args);

        self.ctx
            .runner
            .run(&self.yum().args(["-y", "-q", plan.operation.as_str()]).args(args))
    }
}
