// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("install-docker-ee")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Docker EE Installer Contributors")
        .about("Install Docker EE through the native package manager")
        .arg(
            Arg::new("docker_url")
                .long("docker-url")
                .env("DOCKER_URL")
                .value_name("URL")
                .help("Repository base URL"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .env("VERSION")
                .value_name("VERSION")
                .help("Docker EE release to install, e.g. 20.10.12 (latest if omitted)"),
        )
        .arg(
            Arg::new("channel")
                .long("channel")
                .env("CHANNEL")
                .value_name("CHANNEL")
                .help("Repository channel (default: test)"),
        )
        .arg(
            Arg::new("containerd_version")
                .long("containerd-version")
                .env("CONTAINERD_VERSION")
                .value_name("VERSION")
                .help("containerd release prefix to pin, e.g. 1.6"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .env("DRY_RUN")
                .action(ArgAction::SetTrue)
                .help("Print mutating commands instead of running them"),
        )
        .arg(
            Arg::new("os_release")
                .long("os-release")
                .value_name("PATH")
                .default_value("/etc/os-release")
                .help("os-release file describing the host"),
        )
        .disable_version_flag(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    // Generate main man page
    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    let man_path = man_dir.join("install-docker-ee.1");
    fs::write(&man_path, buffer)?;

    println!("cargo:warning=Man page generated at {}", man_path.display());
    Ok(())
}
