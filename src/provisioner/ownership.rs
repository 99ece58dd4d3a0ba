//! Ownership checks run before any destructive backend call.

use thiserror::Error;

use crate::backend::VolumeName;
use crate::descriptor::Provenance;

use super::delete::IgnoreReason;

/// Errors raised when a descriptor carries no provisioner identity at all.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OwnershipError {
    /// The identity annotation is absent.
    #[error("identity annotation not found on volume")]
    MissingIdentity,
}

/// Result of checking a descriptor against this provisioner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ownership {
    /// The descriptor is ours and names this backend volume.
    Owned(VolumeName),
    /// The descriptor must be left alone.
    Ignored(IgnoreReason),
}

/// Checks that `provenance` was written by the provisioner with `identity`
/// and names a backend volume.
///
/// # Errors
///
/// Returns [`OwnershipError::MissingIdentity`] when the identity annotation
/// is absent.
pub fn verify(provenance: &Provenance, identity: &str) -> Result<Ownership, OwnershipError> {
    let found = provenance
        .identity
        .as_deref()
        .ok_or(OwnershipError::MissingIdentity)?;
    if found != identity {
        return Ok(Ownership::Ignored(IgnoreReason::ForeignIdentity {
            found: found.to_owned(),
        }));
    }
    Ok(provenance
        .backend_volume
        .clone()
        .map_or(Ownership::Ignored(IgnoreReason::MissingVolume), Ownership::Owned))
}
