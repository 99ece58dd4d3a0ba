//! Volume descriptors handed back to the orchestrator.
//!
//! A descriptor is the only record that survives between provisioning and
//! deletion. Its [`Provenance`] says which provisioner made it and which
//! backend volume it refers to; on the wire that record is flattened to the
//! string annotations the orchestrator persists.

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::backend::VolumeName;
use crate::volume::{AccessMode, ReclaimPolicy, VolumeRequest};

/// Annotation key carrying the identity of the provisioner that made a
/// descriptor.
pub const IDENTITY_ANNOTATION: &str = "isilonProvisionerIdentity";

/// Annotation key carrying the backend volume name.
pub const VOLUME_ANNOTATION: &str = "isilonVolume";

/// Who made a descriptor and what backend volume it points at.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Provenance {
    /// Identity of the provisioner instance, fixed at its startup.
    pub identity: Option<String>,
    /// Backend volume targeted by teardown calls.
    pub backend_volume: Option<VolumeName>,
}

impl Provenance {
    /// Creates a complete provenance record.
    #[must_use]
    pub fn new(identity: impl Into<String>, backend_volume: VolumeName) -> Self {
        Self {
            identity: Some(identity.into()),
            backend_volume: Some(backend_volume),
        }
    }
}

impl From<BTreeMap<String, String>> for Provenance {
    fn from(annotations: BTreeMap<String, String>) -> Self {
        Self {
            identity: annotations.get(IDENTITY_ANNOTATION).cloned(),
            backend_volume: annotations
                .get(VOLUME_ANNOTATION)
                .and_then(|value| VolumeName::new(value.as_str()).ok()),
        }
    }
}

impl From<Provenance> for BTreeMap<String, String> {
    fn from(provenance: Provenance) -> Self {
        let mut annotations = Self::new();
        if let Some(identity) = provenance.identity {
            annotations.insert(IDENTITY_ANNOTATION.to_owned(), identity);
        }
        if let Some(volume) = provenance.backend_volume {
            annotations.insert(VOLUME_ANNOTATION.to_owned(), volume.as_str().to_owned());
        }
        annotations
    }
}

/// NFS mount target of a volume.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfsSource {
    /// Address of the NFS server.
    pub server: String,
    /// Exported path on the server.
    pub path: String,
    /// Whether the export is mounted read-only.
    #[serde(default)]
    pub read_only: bool,
}

/// Externally persisted handle for a provisioned volume.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDescriptor {
    /// Orchestrator-assigned volume name.
    pub name: String,
    /// Capacity in bytes as requested.
    pub capacity_bytes: u64,
    /// Access modes as requested.
    pub access_modes: BTreeSet<AccessMode>,
    /// Mount options passed to consumers.
    pub mount_options: Vec<String>,
    /// Reclaim policy applied when the claim is released.
    pub reclaim_policy: ReclaimPolicy,
    /// Mount target.
    pub nfs: NfsSource,
    /// Ownership record, persisted as annotations.
    #[serde(rename = "annotations", default)]
    pub provenance: Provenance,
}

/// Maps provisioning results onto [`VolumeDescriptor`] values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DescriptorBuilder {
    server: String,
    root_dir: Utf8PathBuf,
    identity: String,
}

impl DescriptorBuilder {
    /// Creates a builder for descriptors served from `server` under
    /// `root_dir` and stamped with `identity`.
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        root_dir: impl Into<Utf8PathBuf>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            root_dir: root_dir.into(),
            identity: identity.into(),
        }
    }

    /// Returns the export path for a backend volume.
    #[must_use]
    pub fn export_path(&self, name: &VolumeName) -> Utf8PathBuf {
        self.root_dir.join(name.as_str())
    }

    /// Builds the descriptor for a provisioned request.
    ///
    /// Mount options default to a single empty entry and the reclaim policy
    /// defaults to [`ReclaimPolicy::Delete`].
    #[must_use]
    pub fn build(&self, request: &VolumeRequest, name: &VolumeName) -> VolumeDescriptor {
        VolumeDescriptor {
            name: request.volume_name.clone(),
            capacity_bytes: request.capacity_bytes,
            access_modes: request.access_modes.clone(),
            mount_options: request
                .mount_options
                .clone()
                .unwrap_or_else(|| vec![String::new()]),
            reclaim_policy: request.reclaim_policy.unwrap_or_default(),
            nfs: NfsSource {
                server: self.server.clone(),
                path: self.export_path(name).into_string(),
                read_only: false,
            },
            provenance: Provenance::new(self.identity.clone(), name.clone()),
        }
    }
}
