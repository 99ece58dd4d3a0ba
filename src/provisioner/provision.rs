//! Ordered creation of an exported volume.

use std::mem;

use tracing::{info, warn};

use crate::backend::{ExportId, StorageBackend, VolumeName};
use crate::descriptor::VolumeDescriptor;
use crate::quota::QuotaStep;
use crate::volume::VolumeRequest;

use super::Provisioner;
use super::error::{ProvisionError, ProvisionStep};
use super::steps::{StepLog, StepRecord};

/// Outcome of a successful provision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Provisioned {
    /// Descriptor to persist and later pass to delete.
    pub descriptor: VolumeDescriptor,
    /// Backend identifier of the new export.
    pub export_id: ExportId,
    /// Every step that ran, in order.
    pub steps: StepLog,
}

impl<B> Provisioner<B>
where
    B: StorageBackend,
{
    /// Creates, permissions, optionally quotas, and exports a volume for
    /// `request`.
    ///
    /// The quota policy is checked before the first backend call. A failed
    /// quota creation is logged and the volume is exported without one.
    /// Any other backend failure ends the attempt without undoing earlier
    /// steps; the error carries the steps that completed.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the request is invalid, violates the
    /// quota policy, or a backend call other than quota creation fails.
    pub async fn provision(
        &self,
        request: &VolumeRequest,
    ) -> Result<Provisioned, ProvisionError<B::Error>> {
        request.validate()?;
        let name = request.backend_volume_name()?;
        info!(
            namespace = %request.namespace,
            claim = %request.claim_name,
            volume = %request.volume_name,
            capacity_bytes = request.capacity_bytes,
            backend_volume = %name,
            "provisioning volume"
        );

        let quota = self.settings.quota.decide(request.capacity_bytes)?;
        let mut steps = StepLog::default();

        let handle = self
            .backend
            .create_volume(&name)
            .await
            .map_err(|source| step_error(ProvisionStep::CreateVolume, &name, &mut steps, source))?;
        info!(backend_volume = %handle.name, path = %handle.path, "created volume directory");
        steps.push(StepRecord::VolumeCreated {
            name: handle.name,
            path: handle.path,
        });

        let mode = self.settings.volume_mode;
        self.backend
            .set_volume_mode(&name, mode)
            .await
            .map_err(|source| step_error(ProvisionStep::SetMode, &name, &mut steps, source))?;
        info!(backend_volume = %name, %mode, "set volume permissions");
        steps.push(StepRecord::ModeSet {
            name: name.clone(),
            mode,
        });

        steps.push(self.apply_quota(&name, quota).await);

        let zone = self.settings.access_zone.as_str();
        let export_id = self
            .backend
            .export_volume(&name, zone)
            .await
            .map_err(|source| step_error(ProvisionStep::Export, &name, &mut steps, source))?;
        info!(backend_volume = %name, zone, %export_id, "exported volume");
        steps.push(StepRecord::Exported {
            name: name.clone(),
            zone: zone.to_owned(),
            export_id,
        });

        Ok(Provisioned {
            descriptor: self.descriptors.build(request, &name),
            export_id,
            steps,
        })
    }

    async fn apply_quota(&self, name: &VolumeName, step: QuotaStep) -> StepRecord {
        let QuotaStep::Create {
            container,
            size_bytes,
        } = step
        else {
            return StepRecord::QuotaSkipped;
        };

        match self.backend.create_quota(name, container, size_bytes).await {
            Ok(()) => {
                info!(backend_volume = %name, size_bytes, "created container quota");
                StepRecord::QuotaCreated {
                    name: name.clone(),
                    size_bytes,
                }
            }
            Err(err) => {
                warn!(
                    backend_volume = %name,
                    size_bytes,
                    error = %err,
                    "quota creation failed; exporting without quota enforcement"
                );
                StepRecord::QuotaFailed {
                    name: name.clone(),
                    message: err.to_string(),
                }
            }
        }
    }
}

fn step_error<E>(
    step: ProvisionStep,
    name: &VolumeName,
    steps: &mut StepLog,
    source: E,
) -> ProvisionError<E>
where
    E: std::error::Error + 'static,
{
    warn!(backend_volume = %name, %step, error = %source, "provision step failed");
    ProvisionError::Step {
        step,
        volume: name.clone(),
        completed: mem::take(steps),
        source,
    }
}
