//! Error types for the provision and delete workflows.

use std::fmt;

use thiserror::Error;

use crate::backend::{BackendError, VolumeName};
use crate::quota::QuotaError;
use crate::volume::RequestError;

use super::ownership::OwnershipError;
use super::steps::StepLog;

/// Backend call made while provisioning.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProvisionStep {
    /// Creating the volume directory.
    CreateVolume,
    /// Setting the directory mode.
    SetMode,
    /// Exporting the volume.
    Export,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::CreateVolume => "create volume directory",
            Self::SetMode => "set permissions on volume",
            Self::Export => "export volume",
        })
    }
}

/// Backend call made while deleting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteStep {
    /// Removing the quota.
    ClearQuota,
    /// Removing the export.
    Unexport,
    /// Removing the directory.
    DeleteVolume,
}

impl fmt::Display for DeleteStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::ClearQuota => "remove quota from",
            Self::Unexport => "unexport volume directory",
            Self::DeleteVolume => "delete volume directory",
        })
    }
}

/// Errors raised while provisioning a volume.
#[derive(Debug, Error)]
pub enum ProvisionError<BackendErr>
where
    BackendErr: std::error::Error + 'static,
{
    /// Raised when the request is missing an identifying field.
    #[error("invalid volume request: {0}")]
    Request(#[from] RequestError),
    /// Raised when the derived backend volume name is unusable.
    #[error("invalid backend volume name: {0}")]
    Name(#[from] BackendError),
    /// Raised when the request violates the quota policy. Nothing has been
    /// sent to the backend when this is returned.
    #[error(transparent)]
    Quota(#[from] QuotaError),
    /// Raised when a backend call fails. Completed steps are not undone.
    #[error("failed to {step} {volume}: {source}")]
    Step {
        /// Step that failed.
        step: ProvisionStep,
        /// Backend volume name targeted by the attempt.
        volume: VolumeName,
        /// Steps that completed before the failure.
        completed: StepLog,
        /// Provider-specific error.
        #[source]
        source: BackendErr,
    },
}

impl<BackendErr> ProvisionError<BackendErr>
where
    BackendErr: std::error::Error + 'static,
{
    /// Returns the steps that completed before the failure, if any backend
    /// call was made.
    #[must_use]
    pub const fn completed_steps(&self) -> Option<&StepLog> {
        match self {
            Self::Step { completed, .. } => Some(completed),
            Self::Request(_) | Self::Name(_) | Self::Quota(_) => None,
        }
    }
}

/// Errors raised while deleting a volume.
#[derive(Debug, Error)]
pub enum DeleteError<BackendErr>
where
    BackendErr: std::error::Error + 'static,
{
    /// Raised when the descriptor cannot be attributed to any provisioner.
    #[error("cannot verify ownership of volume {volume}: {source}")]
    Ownership {
        /// Orchestrator volume name from the descriptor.
        volume: String,
        /// Reason the descriptor is malformed.
        #[source]
        source: OwnershipError,
    },
    /// Raised when a backend call fails. Remaining steps are not attempted.
    #[error("failed to {step} {volume}: {source}")]
    Step {
        /// Step that failed.
        step: DeleteStep,
        /// Backend volume name.
        volume: VolumeName,
        /// Provider-specific error.
        #[source]
        source: BackendErr,
    },
}
