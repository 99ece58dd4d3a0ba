//! BDD step definitions for the delete workflow.

use isilon_provisioner::test_support::FailurePoint;
use isilon_provisioner::{DeleteOutcome, Provisioner};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{
    DeleteContext, DeleteResult, DeleteTestError, descriptor_made_by, failure_from,
    parse_failure_kind,
};
use crate::provisioner_fixtures::{call_names, settings};
use crate::test_constants::{CAPACITY_BYTES, SERVER};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] DeleteTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a provisioner with quota enforcement enabled")]
fn quota_enabled(delete_context: &DeleteContext) {
    delete_context.quota_enabled.set(true);
}

#[given("a provisioner with quota enforcement disabled")]
fn quota_disabled(delete_context: &DeleteContext) {
    delete_context.quota_enabled.set(false);
}

#[given("the backend holds a quota for the volume")]
fn backend_holds_quota(delete_context: &DeleteContext) {
    delete_context.backend.with_existing_quota(CAPACITY_BYTES);
}

#[given("quota lookup fails")]
fn quota_lookup_fails(delete_context: &DeleteContext) {
    delete_context.backend.fail_at(FailurePoint::GetQuota);
}

#[given("unexporting fails")]
fn unexporting_fails(delete_context: &DeleteContext) {
    delete_context.backend.fail_at(FailurePoint::UnexportVolume);
}

#[given("a descriptor made by this provisioner")]
fn descriptor_made_here(delete_context: &DeleteContext) -> Result<(), StepError> {
    delete_context.descriptor.set(descriptor_made_by(SERVER)?);
    Ok(())
}

#[given("a descriptor made by \"{identity}\"")]
fn descriptor_made_elsewhere(
    delete_context: &DeleteContext,
    identity: String,
) -> Result<(), StepError> {
    delete_context.descriptor.set(descriptor_made_by(&identity)?);
    Ok(())
}

#[given("a descriptor made by this provisioner without a backend volume")]
fn descriptor_without_volume(delete_context: &DeleteContext) -> Result<(), StepError> {
    let mut descriptor = descriptor_made_by(SERVER)?;
    descriptor.provenance.backend_volume = None;
    delete_context.descriptor.set(descriptor);
    Ok(())
}

#[given("a descriptor without an identity")]
fn descriptor_without_identity(delete_context: &DeleteContext) -> Result<(), StepError> {
    let mut descriptor = descriptor_made_by(SERVER)?;
    descriptor.provenance.identity = None;
    delete_context.descriptor.set(descriptor);
    Ok(())
}

#[when("I delete the volume")]
fn delete_volume(delete_context: &DeleteContext) -> Result<(), StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let descriptor = delete_context
        .descriptor
        .get()
        .ok_or_else(|| StepError::Assertion(String::from("no descriptor configured")))?;
    let provisioner = Provisioner::new(
        delete_context.backend.clone(),
        settings(delete_context.quota_enabled.get()),
    );

    let result = runtime.block_on(async move { provisioner.delete(&descriptor).await });
    delete_context.outcome.set(match result {
        Ok(outcome) => DeleteResult::Completed(outcome),
        Err(err) => DeleteResult::Failure(failure_from(&err)),
    });
    Ok(())
}

#[then("the volume \"{name}\" is deleted")]
fn volume_deleted(delete_context: &DeleteContext, name: String) -> Result<(), StepError> {
    match delete_context.outcome.get() {
        Some(DeleteResult::Completed(DeleteOutcome::Deleted { volume }))
            if volume.as_str() == name =>
        {
            Ok(())
        }
        other => Err(StepError::Assertion(format!(
            "expected {name} to be deleted, got {other:?}"
        ))),
    }
}

#[then("the volume is ignored")]
fn volume_ignored(delete_context: &DeleteContext) -> Result<(), StepError> {
    match delete_context.outcome.get() {
        Some(DeleteResult::Completed(DeleteOutcome::Ignored(_))) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected the volume to be ignored, got {other:?}"
        ))),
    }
}

#[then("deletion fails with kind \"{kind}\"")]
fn deletion_fails_with(delete_context: &DeleteContext, kind: String) -> Result<(), StepError> {
    let expected = parse_failure_kind(&kind)?;
    let Some(DeleteResult::Failure(failure)) = delete_context.outcome.get() else {
        return Err(StepError::Assertion(String::from(
            "expected failure outcome",
        )));
    };
    if failure.kind == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected failure kind {expected:?}, got {:?}: {}",
            failure.kind, failure.message
        )))
    }
}

#[then("the backend calls were \"{calls}\"")]
fn backend_calls_were(delete_context: &DeleteContext, calls: String) -> Result<(), StepError> {
    let recorded = call_names(&delete_context.backend.calls());
    if recorded == calls {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected calls {calls}, got {recorded}"
        )))
    }
}

#[then("no backend call was made")]
fn no_backend_call(delete_context: &DeleteContext) -> Result<(), StepError> {
    match delete_context.backend.call_count() {
        0 => Ok(()),
        _ => Err(StepError::Assertion(format!(
            "unexpected backend calls: {}",
            call_names(&delete_context.backend.calls())
        ))),
    }
}
