//! Shared provisioner fixtures for behavioural tests.

use isilon_provisioner::backend::VolumeMode;
use isilon_provisioner::test_support::BackendCall;
use isilon_provisioner::{AccessMode, ProvisionerSettings, QuotaPolicy, VolumeRequest};

use crate::test_constants::{CLAIM, NAMESPACE, ROOT_DIR, SERVER, VOLUME, ZONE};

pub fn settings(quota_enabled: bool) -> ProvisionerSettings {
    ProvisionerSettings {
        identity: String::from(SERVER),
        server: String::from(SERVER),
        root_dir: ROOT_DIR.into(),
        access_zone: String::from(ZONE),
        quota: QuotaPolicy::new(quota_enabled),
        volume_mode: VolumeMode::WORLD_RWX,
    }
}

pub fn request(capacity_bytes: u64) -> VolumeRequest {
    VolumeRequest::builder()
        .namespace(NAMESPACE)
        .claim_name(CLAIM)
        .volume_name(VOLUME)
        .capacity_bytes(capacity_bytes)
        .access_mode(AccessMode::ReadWriteMany)
        .build()
        .unwrap_or_else(|err| panic!("fixture request should build: {err}"))
}

/// Renders recorded calls as a comma-separated list of operation names.
pub fn call_names(calls: &[BackendCall]) -> String {
    calls
        .iter()
        .map(|call| match call {
            BackendCall::CreateVolume(_) => "create_volume",
            BackendCall::SetVolumeMode(..) => "set_volume_mode",
            BackendCall::CreateQuota(..) => "create_quota",
            BackendCall::GetQuota(_) => "get_quota",
            BackendCall::ClearQuota(_) => "clear_quota",
            BackendCall::ExportVolume(..) => "export_volume",
            BackendCall::UnexportVolume(..) => "unexport_volume",
            BackendCall::DeleteVolume(_) => "delete_volume",
        })
        .collect::<Vec<_>>()
        .join(",")
}
