//! Ordered teardown of an exported volume.

use std::fmt;

use tracing::{info, warn};

use crate::backend::{StorageBackend, VolumeName};
use crate::descriptor::VolumeDescriptor;

use super::Provisioner;
use super::error::{DeleteError, DeleteStep};
use super::ownership::{self, Ownership};

/// Why a descriptor was left untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    /// Another provisioner instance made the descriptor.
    ForeignIdentity {
        /// Identity found on the descriptor.
        found: String,
    },
    /// The descriptor names no backend volume, so there is nothing to
    /// delete.
    MissingVolume,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignIdentity { found } => write!(
                formatter,
                "identity annotation '{found}' on volume does not match ours"
            ),
            Self::MissingVolume => formatter.write_str("no backend volume recorded on volume"),
        }
    }
}

/// Outcome of a delete call that did not fail.
///
/// [`DeleteOutcome::Ignored`] is not a failure: callers should neither retry
/// nor alert on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeleteOutcome {
    /// Every backend object for the volume was removed.
    Deleted {
        /// Backend volume that was removed.
        volume: VolumeName,
    },
    /// The descriptor is not this provisioner's to delete.
    Ignored(IgnoreReason),
}

impl<B> Provisioner<B>
where
    B: StorageBackend,
{
    /// Removes the quota, export, and directory behind `descriptor`.
    ///
    /// Descriptors made by another provisioner, or naming no backend volume,
    /// are ignored without any backend call. When quota enforcement is on, a
    /// quota is cleared only if the backend reports one.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError::Ownership`] when the descriptor carries no
    /// identity, and [`DeleteError::Step`] when clearing an existing quota,
    /// unexporting, or deleting the directory fails. Later steps are not
    /// attempted after a failure.
    pub async fn delete(
        &self,
        descriptor: &VolumeDescriptor,
    ) -> Result<DeleteOutcome, DeleteError<B::Error>> {
        let ownership = ownership::verify(&descriptor.provenance, &self.settings.identity)
            .map_err(|source| DeleteError::Ownership {
                volume: descriptor.name.clone(),
                source,
            })?;
        let name = match ownership {
            Ownership::Owned(name) => name,
            Ownership::Ignored(reason) => {
                info!(volume = %descriptor.name, %reason, "ignoring volume");
                return Ok(DeleteOutcome::Ignored(reason));
            }
        };

        if self.settings.quota.is_enabled() {
            self.clear_quota_if_present(&name).await?;
        }

        let zone = self.settings.access_zone.as_str();
        self.backend
            .unexport_volume(&name, zone)
            .await
            .map_err(|source| step_error(DeleteStep::Unexport, &name, source))?;
        info!(backend_volume = %name, zone, "removed export");

        self.backend
            .delete_volume(&name)
            .await
            .map_err(|source| step_error(DeleteStep::DeleteVolume, &name, source))?;
        info!(backend_volume = %name, "deleted volume directory");

        Ok(DeleteOutcome::Deleted { volume: name })
    }

    async fn clear_quota_if_present(&self, name: &VolumeName) -> Result<(), DeleteError<B::Error>> {
        let quota = match self.backend.get_quota(name).await {
            Ok(quota) => quota,
            Err(err) => {
                // A failed lookup is treated like an absent quota.
                warn!(backend_volume = %name, error = %err, "quota lookup failed");
                None
            }
        };
        let Some(existing) = quota else {
            return Ok(());
        };

        self.backend
            .clear_quota(name)
            .await
            .map_err(|source| step_error(DeleteStep::ClearQuota, name, source))?;
        info!(backend_volume = %name, quota_id = %existing.id, "removed quota");
        Ok(())
    }
}

fn step_error<E>(step: DeleteStep, name: &VolumeName, source: E) -> DeleteError<E>
where
    E: std::error::Error + 'static,
{
    warn!(backend_volume = %name, %step, error = %source, "delete step failed");
    DeleteError::Step {
        step,
        volume: name.clone(),
        source,
    }
}
