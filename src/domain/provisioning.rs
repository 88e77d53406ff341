//! Step records and outcomes for multi-step provisioning workflows.
//!
//! A workflow is an ordered list of [`StepRecord`]s. Every step appears in
//! the final [`ProvisioningOutcome`], including the ones that were skipped
//! because an earlier step failed, so a caller can see exactly where a
//! workflow stopped.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::asset::AssetRef;
use super::error::OrchestrationError;

/// Status code for a fully successful create.
pub const STATUS_CREATED: u16 = 201;
/// Status code for a fully successful update or delete.
pub const STATUS_OK: u16 = 200;
/// Status code when the asset to update does not exist.
pub const STATUS_NOT_FOUND: u16 = 400;
/// Fallback when a failed reply carries no code.
pub const STATUS_FAILED: u16 = 500;

/// A resource API reply: either the resource or a status object with
/// `code` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiObject(pub Value);

impl ApiObject {
    pub fn name(&self) -> Option<&str> {
        self.0
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn uid(&self) -> Option<&str> {
        self.0.pointer("/metadata/uid").and_then(Value::as_str)
    }

    pub fn has_metadata(&self) -> bool {
        self.0.get("metadata").is_some_and(|metadata| !metadata.is_null())
    }

    pub fn code(&self) -> Option<u16> {
        self.0
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// True when the reply carries a non-2xx code or a message.
    pub fn is_failure(&self) -> bool {
        self.code().is_some_and(|code| !(200..300).contains(&code)) || self.message().is_some()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ApiObject {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Which remote call a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    ReadAsset,
    CreateSecret,
    CreateAsset,
    PatchSecretOwner,
    PatchSecretData,
    PatchAsset,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::ReadAsset => "read asset",
            StepKind::CreateSecret => "create secret",
            StepKind::CreateAsset => "create asset",
            StepKind::PatchSecretOwner => "patch secret owner",
            StepKind::PatchSecretData => "patch secret data",
            StepKind::PatchAsset => "patch asset",
        };
        f.write_str(name)
    }
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepResult {
    /// The remote side answered (possibly with a status object).
    Returned { reply: ApiObject },
    /// The call never produced a reply.
    Unreachable { message: String },
    /// Not attempted because an earlier step failed.
    Skipped,
}

impl StepResult {
    pub fn reply(&self) -> Option<&ApiObject> {
        match self {
            StepResult::Returned { reply } => Some(reply),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepResult::Skipped)
    }
}

/// One step: what it touched and how it went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub kind: StepKind,
    pub target: String,
    pub result: StepResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Create,
    Update,
}

impl WorkflowKind {
    pub const fn success_code(self) -> u16 {
        match self {
            WorkflowKind::Create => STATUS_CREATED,
            WorkflowKind::Update => STATUS_OK,
        }
    }
}

/// Result of a create or update workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningOutcome {
    pub kind: WorkflowKind,
    pub status_code: u16,
    pub steps: Vec<StepRecord>,
    #[serde(skip)]
    pub failure: Option<OrchestrationError>,
}

impl ProvisioningOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.status_code == self.kind.success_code()
    }

    pub fn step(&self, kind: StepKind) -> Option<&StepRecord> {
        self.steps.iter().find(|record| record.kind == kind)
    }

    /// Reply of the first step of `kind`, if it ran and answered.
    pub fn reply(&self, kind: StepKind) -> Option<&ApiObject> {
        self.step(kind).and_then(|record| record.result.reply())
    }

    /// The step that decided a failed outcome.
    pub fn failed_step(&self) -> Option<&StepRecord> {
        if self.is_success() {
            return None;
        }
        self.steps
            .iter()
            .take_while(|record| !record.result.is_skipped())
            .last()
    }
}

/// One failed item of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub target: AssetRef,
    pub status_code: u16,
    pub message: String,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteOutcome {
    pub status_code: u16,
    pub deleted: usize,
    pub batches: usize,
    pub errors: Vec<ItemFailure>,
    pub message: Option<String>,
}

impl BulkDeleteOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.status_code == STATUS_OK
    }

    /// `Ok(deleted)` or [`OrchestrationError::PartialBatchFailure`].
    ///
    /// # Errors
    ///
    /// Returns the accumulated per-item failures when any item failed.
    pub fn into_result(self) -> Result<usize, OrchestrationError> {
        if self.errors.is_empty() {
            Ok(self.deleted)
        } else {
            Err(OrchestrationError::PartialBatchFailure {
                count: self.errors.len(),
                failures: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_object_detects_status_failures() {
        let status = ApiObject::from(json!({"kind": "Status", "code": 409, "message": "exists"}));
        assert!(status.is_failure());
        assert_eq!(status.code(), Some(409));

        let resource = ApiObject::from(json!({"metadata": {"name": "x", "uid": "u-1"}}));
        assert!(!resource.is_failure());
        assert_eq!(resource.name(), Some("x"));
        assert_eq!(resource.uid(), Some("u-1"));
    }

    #[test]
    fn bulk_outcome_maps_failures_to_partial_batch_error() {
        let outcome = BulkDeleteOutcome {
            status_code: STATUS_FAILED,
            deleted: 1,
            batches: 1,
            errors: vec![ItemFailure {
                target: AssetRef::new("lab", "node-2"),
                status_code: 404,
                message: "not found".into(),
            }],
            message: Some("Failed to delete 1 bare metal asset(s)".into()),
        };
        match outcome.into_result() {
            Err(OrchestrationError::PartialBatchFailure { count, failures }) => {
                assert_eq!(count, 1);
                assert_eq!(failures[0].status_code, 404);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
