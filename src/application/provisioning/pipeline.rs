//! Ordered step pipeline with first-failure short-circuiting.
//!
//! Each awaited call is handed to [`Pipeline::record`] together with what
//! the next step needs from it. The first step that does not deliver
//! decides the outcome's status code; every step after it is recorded as
//! skipped via [`Pipeline::halt`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::OrchestrationError;
use crate::domain::provisioning::{
    ApiObject, ProvisioningOutcome, StepKind, StepRecord, StepResult, WorkflowKind,
    STATUS_FAILED, STATUS_NOT_FOUND,
};
use crate::error::Result;

/// What a step's reply must carry for the workflow to continue.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Expect<'a> {
    /// The resource exists (has metadata); otherwise not found.
    Present,
    /// `metadata.name` is set.
    Named,
    /// `metadata.name` equals the given name.
    NamedAs(&'a str),
    /// No error code or message.
    Accepted,
}

impl Expect<'_> {
    fn holds(&self, reply: &ApiObject) -> bool {
        match self {
            Expect::Present => reply.has_metadata() && !reply.is_failure(),
            Expect::Named => reply.name().is_some(),
            Expect::NamedAs(name) => reply.name() == Some(*name),
            Expect::Accepted => !reply.is_failure(),
        }
    }

    fn failure(&self, kind: StepKind, reply: &ApiObject) -> (u16, OrchestrationError) {
        if let Expect::Present = self {
            return (
                STATUS_NOT_FOUND,
                OrchestrationError::DependencyMissing {
                    what: format!("{kind}: resource not found"),
                },
            );
        }
        let code = reply.code().unwrap_or(STATUS_FAILED);
        if reply.is_failure() {
            (code, OrchestrationError::from_payload(reply.as_value().clone()))
        } else {
            (
                code,
                OrchestrationError::DependencyMissing {
                    what: format!("{kind} returned no usable metadata.name"),
                },
            )
        }
    }
}

pub(crate) struct Pipeline {
    kind: WorkflowKind,
    steps: Vec<StepRecord>,
    failure: Option<(u16, OrchestrationError)>,
}

impl Pipeline {
    pub(crate) fn new(kind: WorkflowKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
            failure: None,
        }
    }

    /// Record a finished call. Returns the reply only if `expect` holds.
    pub(crate) fn record(
        &mut self,
        kind: StepKind,
        target: &str,
        reply: Result<Value>,
        expect: Expect<'_>,
    ) -> Option<ApiObject> {
        match reply {
            Ok(value) => {
                let reply = ApiObject::from(value);
                let accepted = expect.holds(&reply);
                if accepted {
                    debug!(step = %kind, path = target, "Step succeeded");
                } else {
                    let (code, err) = expect.failure(kind, &reply);
                    warn!(step = %kind, path = target, code, error = %err, "Step failed");
                    self.fail(code, err);
                }
                self.steps.push(StepRecord {
                    kind,
                    target: target.to_string(),
                    result: StepResult::Returned {
                        reply: reply.clone(),
                    },
                });
                accepted.then_some(reply)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(step = %kind, path = target, error = %message, "Step unreachable");
                self.fail(STATUS_FAILED, OrchestrationError::Transport(message.clone()));
                self.steps.push(StepRecord {
                    kind,
                    target: target.to_string(),
                    result: StepResult::Unreachable { message },
                });
                None
            }
        }
    }

    /// Fail without a remote reply to blame, e.g. a missing owner uid.
    pub(crate) fn fail(&mut self, code: u16, err: OrchestrationError) {
        if self.failure.is_none() {
            self.failure = Some((code, err));
        }
    }

    /// Mark `remaining` as skipped and finish.
    pub(crate) fn halt(mut self, remaining: &[(StepKind, String)]) -> ProvisioningOutcome {
        for (kind, target) in remaining {
            debug!(step = %kind, path = %target, "Step skipped");
            self.steps.push(StepRecord {
                kind: *kind,
                target: target.clone(),
                result: StepResult::Skipped,
            });
        }
        self.finish()
    }

    pub(crate) fn finish(self) -> ProvisioningOutcome {
        let (status_code, failure) = match self.failure {
            Some((code, err)) => (code, Some(err)),
            None => (self.kind.success_code(), None),
        };
        ProvisioningOutcome {
            kind: self.kind,
            status_code,
            steps: self.steps,
            failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_failure_decides_status() {
        let mut pipeline = Pipeline::new(WorkflowKind::Create);
        let secret = pipeline.record(
            StepKind::CreateSecret,
            "/secrets",
            Ok(json!({"code": 403, "message": "forbidden"})),
            Expect::Named,
        );
        assert!(secret.is_none());

        let outcome = pipeline.halt(&[(StepKind::CreateAsset, "/assets".into())]);
        assert_eq!(outcome.status_code, 403);
        assert_eq!(outcome.steps.len(), 2);
        assert!(outcome.steps[1].result.is_skipped());
        assert_eq!(outcome.failed_step().map(|s| s.kind), Some(StepKind::CreateSecret));
    }

    #[test]
    fn missing_resource_maps_to_not_found() {
        let mut pipeline = Pipeline::new(WorkflowKind::Update);
        let current = pipeline.record(
            StepKind::ReadAsset,
            "/assets/x",
            Ok(json!({"kind": "Status", "code": 404, "message": "not found"})),
            Expect::Present,
        );
        assert!(current.is_none());
        let outcome = pipeline.finish();
        assert_eq!(outcome.status_code, STATUS_NOT_FOUND);
        assert!(matches!(outcome.failure, Some(OrchestrationError::DependencyMissing { .. })));
    }

    #[test]
    fn clean_run_reports_kind_success_code() {
        let mut pipeline = Pipeline::new(WorkflowKind::Update);
        pipeline.record(
            StepKind::PatchAsset,
            "/assets/x",
            Ok(json!({"metadata": {"name": "x"}})),
            Expect::Accepted,
        );
        let outcome = pipeline.finish();
        assert_eq!(outcome.status_code, 200);
        assert!(outcome.is_success());
    }
}
