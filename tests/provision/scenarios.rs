//! BDD scenarios for the provision workflow.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ProvisionContext, provision_context};

#[scenario(
    path = "tests/features/provision.feature",
    name = "Provision a volume with quota enforcement"
)]
fn scenario_provision_with_quota(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Provision a volume without quota enforcement"
)]
fn scenario_provision_without_quota(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Reject a sizeless request while quota enforcement is enabled"
)]
fn scenario_reject_sizeless_request(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Export the volume even when quota creation fails"
)]
fn scenario_quota_failure_still_exports(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Stop after a failed export without undoing earlier steps"
)]
fn scenario_export_failure(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Stop when the volume directory cannot be created"
)]
fn scenario_create_failure(provision_context: ProvisionContext) {
    let _ = provision_context;
}
