//! BDD step definitions for the provision workflow.

use isilon_provisioner::test_support::FailurePoint;
use isilon_provisioner::{Provisioned, Provisioner, StepRecord};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{
    ProvisionContext, ProvisionFailure, ProvisionResult, ProvisionTestError, failure_from,
    parse_failure_kind,
};
use crate::provisioner_fixtures::{call_names, request, settings};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] ProvisionTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a provisioner with quota enforcement enabled")]
fn quota_enabled(provision_context: &ProvisionContext) {
    provision_context.quota_enabled.set(true);
}

#[given("a provisioner with quota enforcement disabled")]
fn quota_disabled(provision_context: &ProvisionContext) {
    provision_context.quota_enabled.set(false);
}

#[given("a request for \"{bytes}\" bytes")]
fn request_for(provision_context: &ProvisionContext, bytes: u64) {
    provision_context.capacity_bytes.set(bytes);
}

#[given("quota creation fails")]
fn quota_creation_fails(provision_context: &ProvisionContext) {
    provision_context.backend.fail_at(FailurePoint::CreateQuota);
}

#[given("exporting fails")]
fn exporting_fails(provision_context: &ProvisionContext) {
    provision_context.backend.fail_at(FailurePoint::ExportVolume);
}

#[given("volume creation fails")]
fn volume_creation_fails(provision_context: &ProvisionContext) {
    provision_context.backend.fail_at(FailurePoint::CreateVolume);
}

#[when("I provision the volume")]
fn provision_volume(provision_context: &ProvisionContext) -> Result<(), StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let provisioner = Provisioner::new(
        provision_context.backend.clone(),
        settings(provision_context.quota_enabled.get()),
    );
    let volume_request = request(provision_context.capacity_bytes.get());

    let result = runtime.block_on(async move { provisioner.provision(&volume_request).await });
    provision_context.outcome.set(match result {
        Ok(provisioned) => ProvisionResult::Success(Box::new(provisioned)),
        Err(err) => ProvisionResult::Failure(failure_from(&err)),
    });
    Ok(())
}

fn provisioned(provision_context: &ProvisionContext) -> Result<Provisioned, StepError> {
    match provision_context.outcome.get() {
        Some(ProvisionResult::Success(provisioned)) => Ok(*provisioned),
        Some(ProvisionResult::Failure(failure)) => Err(StepError::Assertion(format!(
            "expected success, got failure: {}",
            failure.message
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

fn failure(provision_context: &ProvisionContext) -> Result<ProvisionFailure, StepError> {
    match provision_context.outcome.get() {
        Some(ProvisionResult::Failure(failure)) => Ok(failure),
        Some(ProvisionResult::Success(_)) => Err(StepError::Assertion(String::from(
            "expected failure, got success",
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("provisioning succeeds")]
fn provisioning_succeeds(provision_context: &ProvisionContext) -> Result<(), StepError> {
    provisioned(provision_context).map(drop)
}

#[then("the backend volume is \"{name}\"")]
fn backend_volume_is(provision_context: &ProvisionContext, name: String) -> Result<(), StepError> {
    let descriptor = provisioned(provision_context)?.descriptor;
    let recorded = descriptor
        .provenance
        .backend_volume
        .as_ref()
        .map(|volume| volume.as_str().to_owned());
    if recorded.as_deref() == Some(name.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected backend volume {name}, got {recorded:?}"
        )))
    }
}

#[then("the descriptor export path is \"{path}\"")]
fn descriptor_export_path(
    provision_context: &ProvisionContext,
    path: String,
) -> Result<(), StepError> {
    let descriptor = provisioned(provision_context)?.descriptor;
    if descriptor.nfs.path == path {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected export path {path}, got {}",
            descriptor.nfs.path
        )))
    }
}

#[then("the descriptor identity is \"{identity}\"")]
fn descriptor_identity(
    provision_context: &ProvisionContext,
    identity: String,
) -> Result<(), StepError> {
    let descriptor = provisioned(provision_context)?.descriptor;
    if descriptor.provenance.identity.as_deref() == Some(identity.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected identity {identity}, got {:?}",
            descriptor.provenance.identity
        )))
    }
}

#[then("the step log records a quota failure")]
fn step_log_records_quota_failure(provision_context: &ProvisionContext) -> Result<(), StepError> {
    let steps = provisioned(provision_context)?.steps;
    if steps.contains(|record| matches!(record, StepRecord::QuotaFailed { .. })) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a quota failure in {:?}",
            steps.records()
        )))
    }
}

#[then("provisioning fails with kind \"{kind}\"")]
fn provisioning_fails_with(
    provision_context: &ProvisionContext,
    kind: String,
) -> Result<(), StepError> {
    let expected = parse_failure_kind(&kind)?;
    let failure = failure(provision_context)?;
    if failure.kind == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected failure kind {expected:?}, got {:?}: {}",
            failure.kind, failure.message
        )))
    }
}

#[then("the failure reports \"{count}\" completed steps")]
fn failure_reports_completed(
    provision_context: &ProvisionContext,
    count: usize,
) -> Result<(), StepError> {
    let failure = failure(provision_context)?;
    if failure.completed.len() == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} completed steps, got {:?}",
            failure.completed
        )))
    }
}

#[then("the backend calls were \"{calls}\"")]
fn backend_calls_were(
    provision_context: &ProvisionContext,
    calls: String,
) -> Result<(), StepError> {
    let recorded = call_names(&provision_context.backend.calls());
    if recorded == calls {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected calls {calls}, got {recorded}"
        )))
    }
}

#[then("no quota call was made")]
fn no_quota_call(provision_context: &ProvisionContext) -> Result<(), StepError> {
    let calls = provision_context.backend.calls();
    if calls.iter().any(|call| call.is_quota_call()) {
        Err(StepError::Assertion(format!(
            "unexpected quota call in {}",
            call_names(&calls)
        )))
    } else {
        Ok(())
    }
}

#[then("no backend call was made")]
fn no_backend_call(provision_context: &ProvisionContext) -> Result<(), StepError> {
    match provision_context.backend.call_count() {
        0 => Ok(()),
        _ => Err(StepError::Assertion(format!(
            "unexpected backend calls: {}",
            call_names(&provision_context.backend.calls())
        ))),
    }
}
