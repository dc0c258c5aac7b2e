// src/lib.rs

//! Docker EE installer
//!
//! Installs Docker EE through the host's native package manager (APT, YUM or
//! zypper), translating an optional calendar-versioned release into each
//! manager's pinned package spelling.
//!
//! # Architecture
//!
//! - Distro table: os-release ID and version select one backend
//! - Patterns: a requested version compiles to a per-manager listing filter
//! - Resolution: the filter picks main, cli and rootless-extras candidates
//! - Planning: YUM probes whether the transaction is an upgrade or downgrade
//! - Execution: every command goes through a `CommandRunner`, so dry runs and
//!   tests never touch the host

pub mod backend;
pub mod config;
pub mod distro;
mod error;
pub mod packages;
pub mod plan;
pub mod repository;
pub mod system;
pub mod version;

pub use error::{Error, Result};
