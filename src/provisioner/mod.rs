//! Provision and delete workflows for exported NFS volumes.
//!
//! Both workflows are best-effort sequential: each backend call either
//! succeeds or ends the attempt, and nothing already done is undone. A failed
//! provision leaves its completed steps in the returned error so a caller can
//! compensate if it wants to; the reconciliation engine normally just retries
//! with the same request, which targets the same backend volume name.

use camino::Utf8PathBuf;

use crate::backend::{StorageBackend, VolumeMode};
use crate::descriptor::DescriptorBuilder;
use crate::quota::QuotaPolicy;

mod delete;
mod error;
pub mod ownership;
mod provision;
mod steps;

pub use delete::{DeleteOutcome, IgnoreReason};
pub use error::{DeleteError, DeleteStep, ProvisionError, ProvisionStep};
pub use ownership::{Ownership, OwnershipError};
pub use provision::Provisioned;
pub use steps::{StepLog, StepRecord};

/// Values fixed at provisioner startup and shared by every call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionerSettings {
    /// Identity stamped on descriptors and checked before deletion.
    pub identity: String,
    /// NFS server address written into mount targets.
    pub server: String,
    /// Backend directory under which volumes are created and exported.
    pub root_dir: Utf8PathBuf,
    /// Access zone used for exports.
    pub access_zone: String,
    /// Quota enforcement switch.
    pub quota: QuotaPolicy,
    /// Mode applied to new volume directories, already masked.
    pub volume_mode: VolumeMode,
}

/// Runs provision and delete workflows against a storage backend.
///
/// The provisioner holds no per-request state, so one instance can serve
/// concurrent calls for distinct requests.
#[derive(Debug)]
pub struct Provisioner<B> {
    backend: B,
    settings: ProvisionerSettings,
    descriptors: DescriptorBuilder,
}

impl<B> Provisioner<B>
where
    B: StorageBackend,
{
    /// Creates a provisioner bound to `backend`.
    #[must_use]
    pub fn new(backend: B, settings: ProvisionerSettings) -> Self {
        let descriptors = DescriptorBuilder::new(
            settings.server.clone(),
            settings.root_dir.clone(),
            settings.identity.clone(),
        );
        Self {
            backend,
            settings,
            descriptors,
        }
    }

    /// Returns the startup settings.
    #[must_use]
    pub const fn settings(&self) -> &ProvisionerSettings {
        &self.settings
    }
}
