//! BDD scenarios for the delete workflow.

use rstest_bdd_macros::scenario;

use super::test_helpers::{DeleteContext, delete_context};

#[scenario(
    path = "tests/features/delete.feature",
    name = "Delete an owned volume that carries a quota"
)]
fn scenario_delete_with_quota(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Delete an owned volume without a quota"
)]
fn scenario_delete_without_quota(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Skip quota handling when enforcement is disabled"
)]
fn scenario_quota_disabled(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Treat a failed quota lookup as no quota"
)]
fn scenario_quota_lookup_failure(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Ignore a volume made by another provisioner"
)]
fn scenario_foreign_identity(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Ignore a descriptor that names no backend volume"
)]
fn scenario_missing_volume(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Reject a descriptor without an identity"
)]
fn scenario_missing_identity(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete.feature",
    name = "Stop when unexporting fails"
)]
fn scenario_unexport_failure(delete_context: DeleteContext) {
    let _ = delete_context;
}
