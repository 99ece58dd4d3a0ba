//! Capability interface for the remote storage backend.
//!
//! Every method is an independent remote call. The backend offers no
//! multi-step commit, so callers must treat each call as its own unit of
//! failure.

use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of a backend-side volume, used as the sole identifier for every
/// backend call that targets it.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeName(String);

impl VolumeName {
    /// Wraps an already-derived name.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when the name is blank or
    /// contains a path separator.
    pub fn new(value: impl Into<String>) -> Result<Self, BackendError> {
        let name = value.into().trim().to_owned();
        if name.is_empty() || name.contains('/') {
            return Err(BackendError::Validation(String::from("volume_name")));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for VolumeName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for VolumeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for VolumeName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Identifier the backend assigns to an NFS export.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportId(pub u64);

impl fmt::Display for ExportId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Permission bits applied to a freshly created volume directory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VolumeMode(u32);

impl VolumeMode {
    /// World read/write/execute.
    pub const WORLD_RWX: Self = Self(0o777);

    /// Builds a mode from raw permission bits, discarding anything outside
    /// the permission and special bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0o7777)
    }

    /// Returns the mode with the bits in `umask` cleared.
    #[must_use]
    pub const fn masked(self, umask: u32) -> Self {
        Self(self.0 & !umask & 0o7777)
    }

    /// Returns the raw permission bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VolumeMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:04o}", self.0)
    }
}

/// Handle returned once the backend has created a volume directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeHandle {
    /// Name the volume was created under.
    pub name: VolumeName,
    /// Absolute backend path of the directory.
    pub path: String,
}

/// Capacity quota currently attached to a volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuotaInfo {
    /// Backend identifier of the quota.
    pub id: String,
    /// Directory the quota is scoped to.
    pub path: String,
    /// Whether the quota is a container quota.
    pub container: bool,
    /// Hard limit in bytes, when one is set.
    pub hard_limit_bytes: Option<u64>,
}

/// Errors raised while validating backend inputs.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BackendError {
    /// Raised when a request is missing a required field.
    #[error("missing or empty field: {0}")]
    Validation(String),
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Remote calls required to create and destroy one exported volume.
pub trait StorageBackend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates the volume directory without attaching an access-control list.
    fn create_volume<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, VolumeHandle, Self::Error>;

    /// Applies `mode` to the volume directory verbatim.
    fn set_volume_mode<'a>(
        &'a self,
        name: &'a VolumeName,
        mode: VolumeMode,
    ) -> BackendFuture<'a, (), Self::Error>;

    /// Creates a quota with a hard limit of `size_bytes` on the volume.
    fn create_quota<'a>(
        &'a self,
        name: &'a VolumeName,
        container: bool,
        size_bytes: u64,
    ) -> BackendFuture<'a, (), Self::Error>;

    /// Looks up the quota attached to the volume, if any.
    fn get_quota<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, Option<QuotaInfo>, Self::Error>;

    /// Removes the quota attached to the volume.
    fn clear_quota<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error>;

    /// Exports the volume over NFS within the given access zone.
    fn export_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, ExportId, Self::Error>;

    /// Removes the NFS export of the volume from the given access zone.
    fn unexport_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, (), Self::Error>;

    /// Deletes the volume directory and its contents.
    fn delete_volume<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error>;
}
