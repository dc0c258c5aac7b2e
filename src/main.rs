// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use docker_ee_installer::backend::Dispatcher;
use docker_ee_installer::config::InstallerConfig;
use docker_ee_installer::distro::OsRelease;
use docker_ee_installer::repository::HttpRepository;
use docker_ee_installer::system::{Privilege, SystemRunner};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "install-docker-ee")]
#[command(author, about = "Install Docker EE through the native package manager", long_about = None)]
struct Cli {
    /// Repository base URL
    #[arg(long, env = "DOCKER_URL")]
    docker_url: Option<String>,

    /// Docker EE release to install, e.g. 20.10.12 (latest if omitted)
    #[arg(long, env = "VERSION")]
    version: Option<String>,

    /// Repository channel (default: test)
    #[arg(long, env = "CHANNEL")]
    channel: Option<String>,

    /// containerd release prefix to pin, e.g. 1.6
    #[arg(long, env = "CONTAINERD_VERSION")]
    containerd_version: Option<String>,

    /// Print mutating commands instead of running them
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// os-release file describing the host
    #[arg(long, default_value = "/etc/os-release")]
    os_release: PathBuf,
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = InstallerConfig::new(
        cli.docker_url,
        cli.version,
        cli.channel,
        cli.containerd_version,
        cli.dry_run,
    )?;

    let privilege = Privilege::detect()?;
    info!("Elevating with {:?}", privilege);

    let release = OsRelease::load(&cli.os_release)?;
    let runner = SystemRunner::new(privilege, config.dry_run);
    let probe = HttpRepository::new()?;

    let plan = Dispatcher::new(&config, &runner, &probe).dispatch_release(&release)?;

    if config.dry_run {
        let json = serde_json::to_string_pretty(&plan).context("Failed to render install plan")?;
        println!("{}", json);
    } else {
        info!("Docker EE {} installed", config.version);
    }
    Ok(())
}
