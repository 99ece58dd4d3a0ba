//! Command-line interface definitions for the `isilon-provisioner` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page. It
//! depends on clap alone; values are parsed into domain types by the binary.

use clap::Parser;

/// Top-level CLI for the `isilon-provisioner` binary.
#[derive(Debug, Parser)]
#[command(
    name = "isilon-provisioner",
    version,
    about = "Provision and delete NFS-exported volumes on an Isilon/OneFS cluster",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create, permission, quota, and export a volume, then print its
    /// descriptor as JSON.
    #[command(name = "provision", about = "Provision an exported volume for a claim")]
    Provision(ProvisionCommand),
    /// Tear down the volume behind a descriptor file.
    #[command(name = "delete", about = "Delete the volume behind a descriptor")]
    Delete(DeleteCommand),
    /// Print the effective provisioner configuration.
    #[command(name = "info", about = "Show the provisioner name and backend settings")]
    Info,
}

/// Arguments for the `isilon-provisioner provision` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ProvisionCommand {
    /// Namespace of the claim.
    #[arg(long, value_name = "NAMESPACE")]
    pub(crate) namespace: String,
    /// Name of the claim.
    #[arg(long, value_name = "CLAIM")]
    pub(crate) claim: String,
    /// Orchestrator-assigned volume name.
    #[arg(long, value_name = "NAME")]
    pub(crate) volume_name: String,
    /// Requested capacity, either bytes or a quantity such as `10Gi` or `500M`.
    #[arg(long, value_name = "QUANTITY", default_value = "0")]
    pub(crate) capacity: String,
    /// Access mode, repeatable (`ReadWriteOnce`, `RWX`, ...).
    #[arg(long = "access-mode", value_name = "MODE")]
    pub(crate) access_modes: Vec<String>,
    /// Mount option, repeatable. Omitting it yields the default empty option.
    #[arg(long = "mount-option", value_name = "OPTION")]
    pub(crate) mount_options: Vec<String>,
    /// Reclaim policy (`Delete` or `Retain`). Defaults to `Delete`.
    #[arg(long, value_name = "POLICY")]
    pub(crate) reclaim_policy: Option<String>,
}

/// Arguments for the `isilon-provisioner delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// JSON descriptor previously printed by `provision`.
    #[arg(long, value_name = "PATH")]
    pub(crate) descriptor: String,
}
