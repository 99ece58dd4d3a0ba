//! Core library for the Isilon NFS volume provisioner.
//!
//! The crate exposes a capability interface over the storage backend, the
//! provision and delete workflows that drive it, and a OneFS implementation
//! of that interface. Provisioning creates a directory, sets its mode,
//! optionally applies a container quota, and exports it over NFS; deletion
//! reverses the sequence once the descriptor's ownership has been verified.

pub mod backend;
pub mod config;
pub mod descriptor;
pub mod isilon;
pub mod provisioner;
pub mod quota;
#[cfg(test)]
pub mod test_helpers;
pub mod test_support;
pub mod volume;

pub use backend::{
    BackendError, BackendFuture, ExportId, QuotaInfo, StorageBackend, VolumeHandle, VolumeMode,
    VolumeName,
};
pub use config::{ConfigError, ProvisionerConfig};
pub use descriptor::{DescriptorBuilder, NfsSource, Provenance, VolumeDescriptor};
pub use isilon::{IsilonBackend, IsilonBackendError};
pub use provisioner::{
    DeleteError, DeleteOutcome, DeleteStep, IgnoreReason, ProvisionError, ProvisionStep,
    Provisioned, Provisioner, ProvisionerSettings, StepLog, StepRecord,
};
pub use quota::{QuotaError, QuotaPolicy, QuotaStep};
pub use volume::{
    AccessMode, ReclaimPolicy, RequestError, VolumeRequest, VolumeRequestBuilder,
    backend_volume_name, parse_capacity,
};
