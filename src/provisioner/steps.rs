//! Record of the backend mutations made by one provision attempt.

use crate::backend::{ExportId, VolumeMode, VolumeName};

/// One completed step of a provision attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepRecord {
    /// The volume directory was created.
    VolumeCreated {
        /// Backend volume name.
        name: VolumeName,
        /// Absolute backend path of the directory.
        path: String,
    },
    /// The directory mode was set.
    ModeSet {
        /// Backend volume name.
        name: VolumeName,
        /// Mode applied.
        mode: VolumeMode,
    },
    /// A container quota was created.
    QuotaCreated {
        /// Backend volume name.
        name: VolumeName,
        /// Hard limit in bytes.
        size_bytes: u64,
    },
    /// Quota enforcement is off, so no quota was attempted.
    QuotaSkipped,
    /// Quota creation failed and the volume was exported without one.
    QuotaFailed {
        /// Backend volume name.
        name: VolumeName,
        /// Backend error message.
        message: String,
    },
    /// The volume was exported.
    Exported {
        /// Backend volume name.
        name: VolumeName,
        /// Access zone of the export.
        zone: String,
        /// Backend export identifier.
        export_id: ExportId,
    },
}

impl StepRecord {
    /// Returns whether the step changed backend state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::VolumeCreated { .. }
                | Self::ModeSet { .. }
                | Self::QuotaCreated { .. }
                | Self::Exported { .. }
        )
    }
}

/// Ordered log of completed steps.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    /// Appends a completed step.
    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// Returns every record in completion order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Returns the steps that changed backend state, newest first, which is
    /// the order a compensating teardown would undo them in.
    pub fn mutations_newest_first(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().rev().filter(|record| record.is_mutation())
    }

    /// Returns whether the log holds a record of the given kind.
    #[must_use]
    pub fn contains(&self, predicate: impl Fn(&StepRecord) -> bool) -> bool {
        self.records.iter().any(predicate)
    }
}
