//! Binary entry point for the Isilon provisioner CLI.

use std::io::{self, Write};
use std::process;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use isilon_provisioner::{
    DeleteError, DeleteOutcome, IsilonBackend, IsilonBackendError, ProvisionError,
    ProvisionerConfig, Provisioner, ReclaimPolicy, RequestError, VolumeDescriptor, VolumeRequest,
    parse_capacity,
};

mod cli;
#[cfg(test)]
mod test_helpers;

use cli::{Cli, DeleteCommand, ProvisionCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("invalid volume request: {0}")]
    Request(#[from] RequestError),
    #[error("cannot read descriptor {path}: {message}")]
    Descriptor { path: String, message: String },
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError<IsilonBackendError>),
    #[error("deletion failed: {0}")]
    Delete(#[from] DeleteError<IsilonBackendError>),
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = ProvisionerConfig::load_without_cli_args()
        .map_err(|err| CliError::Config(err.to_string()))?;
    let stdout = io::stdout();
    match cli {
        Cli::Provision(command) => provision(&config, command, stdout).await,
        Cli::Delete(command) => delete(&config, &command, stdout).await,
        Cli::Info => {
            config
                .validate()
                .map_err(|err| CliError::Config(err.to_string()))?;
            write_info(stdout, &config)
        }
    }
}

async fn provision(
    config: &ProvisionerConfig,
    command: ProvisionCommand,
    out: impl Write,
) -> Result<(), CliError> {
    let request = build_request(command)?;
    let provisioner = connect(config)?;
    let provisioned = provisioner.provision(&request).await?;
    write_descriptor(out, &provisioned.descriptor)
}

async fn delete(
    config: &ProvisionerConfig,
    command: &DeleteCommand,
    out: impl Write,
) -> Result<(), CliError> {
    let descriptor = read_descriptor(Utf8Path::new(&command.descriptor))?;
    let provisioner = connect(config)?;
    let outcome = provisioner.delete(&descriptor).await?;
    write_outcome(out, &outcome)
}

fn connect(config: &ProvisionerConfig) -> Result<Provisioner<IsilonBackend>, CliError> {
    let settings = config
        .settings()
        .map_err(|err| CliError::Config(err.to_string()))?;
    let backend = IsilonBackend::new(config).map_err(|err| CliError::Backend(err.to_string()))?;
    let endpoint = backend.endpoint().to_owned();
    let provisioner = Provisioner::new(backend, settings);
    let ready = provisioner.settings();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        name = %config.qualified_name(),
        %endpoint,
        root = %ready.root_dir,
        zone = %ready.access_zone,
        quota = ready.quota.is_enabled(),
        "isilon provisioner ready"
    );
    Ok(provisioner)
}

fn build_request(command: ProvisionCommand) -> Result<VolumeRequest, CliError> {
    let ProvisionCommand {
        namespace,
        claim,
        volume_name,
        capacity,
        access_modes,
        mount_options,
        reclaim_policy,
    } = command;

    let reclaim = reclaim_policy
        .as_deref()
        .map(str::parse::<ReclaimPolicy>)
        .transpose()?;
    let mut builder = VolumeRequest::builder()
        .namespace(namespace)
        .claim_name(claim)
        .volume_name(volume_name)
        .capacity_bytes(parse_capacity(&capacity)?)
        .mount_options((!mount_options.is_empty()).then_some(mount_options))
        .reclaim_policy(reclaim);
    for raw in &access_modes {
        builder = builder.access_mode(raw.parse()?);
    }
    Ok(builder.build()?)
}

fn read_descriptor(path: &Utf8Path) -> Result<VolumeDescriptor, CliError> {
    let descriptor_error = |message: String| CliError::Descriptor {
        path: path.to_string(),
        message,
    };

    let (dir_path, file_name) = split_descriptor_path(path)
        .ok_or_else(|| descriptor_error(String::from("path has no file name")))?;
    let dir = Dir::open_ambient_dir(dir_path, ambient_authority())
        .map_err(|err| descriptor_error(err.to_string()))?;
    let contents = dir
        .read_to_string(file_name)
        .map_err(|err| descriptor_error(err.to_string()))?;
    serde_json::from_str(&contents).map_err(|err| descriptor_error(err.to_string()))
}

/// Splits a descriptor path into the directory to open and the file to read
/// from it. A bare file name resolves against the working directory.
fn split_descriptor_path(path: &Utf8Path) -> Option<(&Utf8Path, &str)> {
    let file_name = path.file_name()?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Some((parent, file_name))
}

fn write_descriptor(mut out: impl Write, descriptor: &VolumeDescriptor) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(descriptor)
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(out, "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn write_outcome(mut out: impl Write, outcome: &DeleteOutcome) -> Result<(), CliError> {
    let result = match outcome {
        DeleteOutcome::Deleted { volume } => writeln!(out, "deleted {volume}"),
        DeleteOutcome::Ignored(reason) => writeln!(out, "ignored: {reason}"),
    };
    result.map_err(|err| CliError::Output(err.to_string()))
}

fn write_info(mut out: impl Write, config: &ProvisionerConfig) -> Result<(), CliError> {
    let quota = if config.quota_enabled() {
        "enabled"
    } else {
        "disabled"
    };
    writeln!(
        out,
        "name: {}\nendpoint: {}\nroot: {}\nzone: {}\nidentity: {}\nquota: {quota}",
        config.qualified_name(),
        config.endpoint(),
        config.path.trim(),
        config.zone.trim(),
        config.identity(),
    )
    .map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
