//! Volume requests and backend volume naming.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendError, VolumeName};

/// Separator placed between the request fields that make up a backend name.
pub const VOLUME_NAME_SEPARATOR: &str = "-";

/// Derives the backend volume name for a request.
///
/// The result is `namespace-claim-volume`. Orchestrator volume names are
/// globally unique, so two distinct requests never map to the same name, and
/// a retried request always targets the same backend object.
///
/// # Errors
///
/// Returns [`BackendError::Validation`] when the joined name is unusable as a
/// path segment.
pub fn backend_volume_name(
    namespace: &str,
    claim_name: &str,
    volume_name: &str,
) -> Result<VolumeName, BackendError> {
    VolumeName::new([namespace, claim_name, volume_name].join(VOLUME_NAME_SEPARATOR))
}

/// How a volume may be mounted by consumers.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum AccessMode {
    /// Read-write by a single node.
    ReadWriteOnce,
    /// Read-only by many nodes.
    ReadOnlyMany,
    /// Read-write by many nodes.
    ReadWriteMany,
    /// Read-write by a single pod.
    ReadWriteOncePod,
}

impl AccessMode {
    /// Returns the canonical name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadWriteOnce => "ReadWriteOnce",
            Self::ReadOnlyMany => "ReadOnlyMany",
            Self::ReadWriteMany => "ReadWriteMany",
            Self::ReadWriteOncePod => "ReadWriteOncePod",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ReadWriteOnce" | "RWO" => Ok(Self::ReadWriteOnce),
            "ReadOnlyMany" | "ROX" => Ok(Self::ReadOnlyMany),
            "ReadWriteMany" | "RWX" => Ok(Self::ReadWriteMany),
            "ReadWriteOncePod" | "RWOP" => Ok(Self::ReadWriteOncePod),
            other => Err(RequestError::UnknownAccessMode(other.to_owned())),
        }
    }
}

/// What the orchestrator does with the volume once its claim is released.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReclaimPolicy {
    /// Delete the backend volume.
    #[default]
    Delete,
    /// Keep the backend volume for manual reclamation.
    Retain,
}

impl fmt::Display for ReclaimPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => formatter.write_str("Delete"),
            Self::Retain => formatter.write_str("Retain"),
        }
    }
}

impl FromStr for ReclaimPolicy {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Delete" | "delete" => Ok(Self::Delete),
            "Retain" | "retain" => Ok(Self::Retain),
            other => Err(RequestError::UnknownReclaimPolicy(other.to_owned())),
        }
    }
}

/// Errors raised while building a [`VolumeRequest`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RequestError {
    /// Raised when a required field is blank.
    #[error("missing or empty field: {0}")]
    MissingField(String),
    /// Raised when an access mode is not recognised.
    #[error("unknown access mode '{0}'")]
    UnknownAccessMode(String),
    /// Raised when a reclaim policy is not recognised.
    #[error("unknown reclaim policy '{0}'")]
    UnknownReclaimPolicy(String),
    /// Raised when a capacity string cannot be parsed.
    #[error("invalid capacity '{0}'")]
    InvalidCapacity(String),
}

/// A request for one provisioned volume. Immutable once built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeRequest {
    /// Namespace of the requesting claim.
    pub namespace: String,
    /// Name of the requesting claim.
    pub claim_name: String,
    /// Volume name assigned by the orchestrator.
    pub volume_name: String,
    /// Requested capacity in bytes; zero means unspecified.
    pub capacity_bytes: u64,
    /// Requested access modes.
    pub access_modes: BTreeSet<AccessMode>,
    /// Mount options from the storage class, if it declares any.
    pub mount_options: Option<Vec<String>>,
    /// Reclaim policy from the storage class, if it declares one.
    pub reclaim_policy: Option<ReclaimPolicy>,
}

impl VolumeRequest {
    /// Starts a builder for a [`VolumeRequest`].
    #[must_use]
    pub fn builder() -> VolumeRequestBuilder {
        VolumeRequestBuilder::default()
    }

    /// Validates that every identifying field is present.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (field, value) in [
            ("namespace", &self.namespace),
            ("claim_name", &self.claim_name),
            ("volume_name", &self.volume_name),
        ] {
            if value.is_empty() {
                return Err(RequestError::MissingField(field.to_owned()));
            }
        }
        Ok(())
    }

    /// Derives the backend volume name for this request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when the derived name is
    /// unusable.
    pub fn backend_volume_name(&self) -> Result<VolumeName, BackendError> {
        backend_volume_name(&self.namespace, &self.claim_name, &self.volume_name)
    }
}

/// Builder for [`VolumeRequest`] that trims and validates on build.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VolumeRequestBuilder {
    namespace: String,
    claim_name: String,
    volume_name: String,
    capacity_bytes: u64,
    access_modes: BTreeSet<AccessMode>,
    mount_options: Option<Vec<String>>,
    reclaim_policy: Option<ReclaimPolicy>,
}

impl VolumeRequestBuilder {
    /// Sets the claim namespace.
    #[must_use]
    pub fn namespace(mut self, value: impl Into<String>) -> Self {
        self.namespace = value.into();
        self
    }

    /// Sets the claim name.
    #[must_use]
    pub fn claim_name(mut self, value: impl Into<String>) -> Self {
        self.claim_name = value.into();
        self
    }

    /// Sets the orchestrator-assigned volume name.
    #[must_use]
    pub fn volume_name(mut self, value: impl Into<String>) -> Self {
        self.volume_name = value.into();
        self
    }

    /// Sets the requested capacity in bytes.
    #[must_use]
    pub const fn capacity_bytes(mut self, value: u64) -> Self {
        self.capacity_bytes = value;
        self
    }

    /// Adds an access mode.
    #[must_use]
    pub fn access_mode(mut self, value: AccessMode) -> Self {
        self.access_modes.insert(value);
        self
    }

    /// Sets the storage class mount options.
    #[must_use]
    pub fn mount_options(mut self, value: Option<Vec<String>>) -> Self {
        self.mount_options = value;
        self
    }

    /// Sets the storage class reclaim policy.
    #[must_use]
    pub const fn reclaim_policy(mut self, value: Option<ReclaimPolicy>) -> Self {
        self.reclaim_policy = value;
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MissingField`] when an identifying field is
    /// blank.
    pub fn build(self) -> Result<VolumeRequest, RequestError> {
        let request = VolumeRequest {
            namespace: self.namespace.trim().to_owned(),
            claim_name: self.claim_name.trim().to_owned(),
            volume_name: self.volume_name.trim().to_owned(),
            capacity_bytes: self.capacity_bytes,
            access_modes: self.access_modes,
            mount_options: self.mount_options,
            reclaim_policy: self.reclaim_policy,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Parses a capacity such as `10Gi`, `500M` or `1048576` into bytes.
///
/// Binary suffixes (`Ki`, `Mi`, `Gi`, `Ti`, `Pi`) are powers of 1024 and
/// decimal suffixes (`k`, `M`, `G`, `T`, `P`) are powers of 1000.
///
/// # Errors
///
/// Returns [`RequestError::InvalidCapacity`] when the value is malformed or
/// overflows.
pub fn parse_capacity(raw: &str) -> Result<u64, RequestError> {
    let value = raw.trim();
    let invalid = || RequestError::InvalidCapacity(raw.to_owned());
    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, suffix) = value.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let number: u64 = digits.parse().map_err(|_| invalid())?;
    let multiplier: u64 = match suffix {
        "" => 1,
        "k" | "K" => 1_000,
        "M" => 1_000_000,
        "G" => 1_000_000_000,
        "T" => 1_000_000_000_000,
        "P" => 1_000_000_000_000_000,
        "Ki" => 1 << 10,
        "Mi" => 1 << 20,
        "Gi" => 1 << 30,
        "Ti" => 1 << 40,
        "Pi" => 1 << 50,
        _ => return Err(invalid()),
    };
    number.checked_mul(multiplier).ok_or_else(invalid)
}
