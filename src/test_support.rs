//! Test support utilities shared across unit and integration tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::backend::{
    BackendFuture, ExportId, QuotaInfo, StorageBackend, VolumeHandle, VolumeMode, VolumeName,
};

/// A single call observed by [`RecordingBackend`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendCall {
    /// `create_volume(name)`.
    CreateVolume(String),
    /// `set_volume_mode(name, mode)`.
    SetVolumeMode(String, u32),
    /// `create_quota(name, container, size_bytes)`.
    CreateQuota(String, bool, u64),
    /// `get_quota(name)`.
    GetQuota(String),
    /// `clear_quota(name)`.
    ClearQuota(String),
    /// `export_volume(name, zone)`.
    ExportVolume(String, String),
    /// `unexport_volume(name, zone)`.
    UnexportVolume(String, String),
    /// `delete_volume(name)`.
    DeleteVolume(String),
}

impl BackendCall {
    /// Returns the backend volume name the call targeted.
    #[must_use]
    pub fn volume(&self) -> &str {
        match self {
            Self::CreateVolume(name)
            | Self::SetVolumeMode(name, _)
            | Self::CreateQuota(name, _, _)
            | Self::GetQuota(name)
            | Self::ClearQuota(name)
            | Self::ExportVolume(name, _)
            | Self::UnexportVolume(name, _)
            | Self::DeleteVolume(name) => name,
        }
    }

    /// Returns whether the call changes backend state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetQuota(_))
    }

    /// Returns whether the call touches quotas.
    #[must_use]
    pub const fn is_quota_call(&self) -> bool {
        matches!(
            self,
            Self::CreateQuota(..) | Self::GetQuota(_) | Self::ClearQuota(_)
        )
    }
}

/// Backend operation that [`RecordingBackend`] can be told to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailurePoint {
    /// Fail `create_volume`.
    CreateVolume,
    /// Fail `set_volume_mode`.
    SetVolumeMode,
    /// Fail `create_quota`.
    CreateQuota,
    /// Fail `get_quota`.
    GetQuota,
    /// Fail `clear_quota`.
    ClearQuota,
    /// Fail `export_volume`.
    ExportVolume,
    /// Fail `unexport_volume`.
    UnexportVolume,
    /// Fail `delete_volume`.
    DeleteVolume,
}

impl FailurePoint {
    const fn flag(self) -> u8 {
        match self {
            Self::CreateVolume => 0b0000_0001,
            Self::SetVolumeMode => 0b0000_0010,
            Self::CreateQuota => 0b0000_0100,
            Self::GetQuota => 0b0000_1000,
            Self::ClearQuota => 0b0001_0000,
            Self::ExportVolume => 0b0010_0000,
            Self::UnexportVolume => 0b0100_0000,
            Self::DeleteVolume => 0b1000_0000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Failures(u8);

impl Failures {
    const fn set(&mut self, point: FailurePoint) {
        self.0 |= point.flag();
    }

    const fn contains(self, point: FailurePoint) -> bool {
        self.0 & point.flag() != 0
    }
}

/// Error returned by [`RecordingBackend`] at an injected failure point.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("injected {point:?} failure")]
pub struct InjectedFailure {
    /// Operation that failed.
    pub point: FailurePoint,
}

#[derive(Debug, Default)]
struct State {
    failures: Failures,
    quota: Option<QuotaInfo>,
    calls: Vec<BackendCall>,
    next_export_id: u64,
}

/// In-memory backend that records every call and fails on request.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<State>>,
}

impl RecordingBackend {
    /// Creates a backend on which every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call to `point` fail.
    pub fn fail_at(&self, point: FailurePoint) {
        self.lock().failures.set(point);
    }

    /// Makes `get_quota` report a quota on any volume.
    pub fn with_existing_quota(&self, size_bytes: u64) {
        self.lock().quota = Some(QuotaInfo {
            id: String::from("quota-1"),
            path: String::from("/ifs/test"),
            container: true,
            hard_limit_bytes: Some(size_bytes),
        });
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Returns how many calls have been recorded.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: BackendCall, point: FailurePoint) -> Result<(), InjectedFailure> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failures.contains(point) {
            return Err(InjectedFailure { point });
        }
        Ok(())
    }
}

impl StorageBackend for RecordingBackend {
    type Error = InjectedFailure;

    fn create_volume<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, VolumeHandle, Self::Error> {
        let result = self
            .record(
                BackendCall::CreateVolume(name.to_string()),
                FailurePoint::CreateVolume,
            )
            .map(|()| VolumeHandle {
                name: name.clone(),
                path: format!("/ifs/test/{name}"),
            });
        Box::pin(std::future::ready(result))
    }

    fn set_volume_mode<'a>(
        &'a self,
        name: &'a VolumeName,
        mode: VolumeMode,
    ) -> BackendFuture<'a, (), Self::Error> {
        let result = self.record(
            BackendCall::SetVolumeMode(name.to_string(), mode.bits()),
            FailurePoint::SetVolumeMode,
        );
        Box::pin(std::future::ready(result))
    }

    fn create_quota<'a>(
        &'a self,
        name: &'a VolumeName,
        container: bool,
        size_bytes: u64,
    ) -> BackendFuture<'a, (), Self::Error> {
        let result = self.record(
            BackendCall::CreateQuota(name.to_string(), container, size_bytes),
            FailurePoint::CreateQuota,
        );
        Box::pin(std::future::ready(result))
    }

    fn get_quota<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, Option<QuotaInfo>, Self::Error> {
        let result = self
            .record(BackendCall::GetQuota(name.to_string()), FailurePoint::GetQuota)
            .map(|()| self.lock().quota.clone());
        Box::pin(std::future::ready(result))
    }

    fn clear_quota<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error> {
        let result = self.record(
            BackendCall::ClearQuota(name.to_string()),
            FailurePoint::ClearQuota,
        );
        Box::pin(std::future::ready(result))
    }

    fn export_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, ExportId, Self::Error> {
        let result = self
            .record(
                BackendCall::ExportVolume(name.to_string(), zone.to_owned()),
                FailurePoint::ExportVolume,
            )
            .map(|()| {
                let mut state = self.lock();
                state.next_export_id += 1;
                ExportId(state.next_export_id)
            });
        Box::pin(std::future::ready(result))
    }

    fn unexport_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, (), Self::Error> {
        let result = self.record(
            BackendCall::UnexportVolume(name.to_string(), zone.to_owned()),
            FailurePoint::UnexportVolume,
        );
        Box::pin(std::future::ready(result))
    }

    fn delete_volume<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error> {
        let result = self.record(
            BackendCall::DeleteVolume(name.to_string()),
            FailurePoint::DeleteVolume,
        );
        Box::pin(std::future::ready(result))
    }
}
