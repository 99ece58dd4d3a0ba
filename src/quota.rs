//! Quota policy applied while provisioning.

use thiserror::Error;

/// Errors raised when a request cannot satisfy the quota policy.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum QuotaError {
    /// Quota enforcement is on but the request carries no capacity.
    #[error("no capacity requested while quota enforcement is enabled")]
    CapacityRequired,
}

/// What the provisioner should do about quotas for one request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuotaStep {
    /// Do not touch quotas.
    Skip,
    /// Create a quota with the given hard limit.
    Create {
        /// Scope the quota to the whole directory.
        container: bool,
        /// Hard limit in bytes.
        size_bytes: u64,
    },
}

/// Quota enforcement switch, fixed at startup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QuotaPolicy {
    enabled: bool,
}

impl QuotaPolicy {
    /// Creates a policy with enforcement switched on or off.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns whether quota enforcement is switched on.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Decides the quota step for a request of `capacity_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`QuotaError::CapacityRequired`] when enforcement is on and
    /// the capacity is zero.
    pub const fn decide(self, capacity_bytes: u64) -> Result<QuotaStep, QuotaError> {
        if !self.enabled {
            return Ok(QuotaStep::Skip);
        }
        if capacity_bytes == 0 {
            return Err(QuotaError::CapacityRequired);
        }
        Ok(QuotaStep::Create {
            container: true,
            size_bytes: capacity_bytes,
        })
    }
}
