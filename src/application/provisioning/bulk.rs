//! Batched bulk delete.

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::asset::AssetProvisioner;
use crate::domain::asset::AssetRef;
use crate::domain::error::OrchestrationError;
use crate::domain::provisioning::{BulkDeleteOutcome, ItemFailure, STATUS_FAILED, STATUS_OK};

/// Deletes issued concurrently per batch.
pub const BULK_BATCH_SIZE: usize = 5;

/// Read delete targets from caller JSON: a list of `{namespace, name}`.
///
/// # Errors
///
/// Returns [`OrchestrationError::InputInvalid`] if `input` is not a list or
/// an entry lacks either field.
pub fn parse_targets(input: &Value) -> Result<Vec<AssetRef>, OrchestrationError> {
    let entries = input.as_array().ok_or_else(|| OrchestrationError::InputInvalid {
        reason: "Array of assets is expected".into(),
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let field = |key: &str| entry.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
            match (field("namespace"), field("name")) {
                (Some(namespace), Some(name)) => Ok(AssetRef::new(namespace, name)),
                _ => Err(OrchestrationError::InputInvalid {
                    reason: format!("asset #{idx} needs a namespace and a name"),
                }),
            }
        })
        .collect()
}

impl AssetProvisioner {
    /// Delete `targets` in batches of [`BULK_BATCH_SIZE`].
    ///
    /// Deletes within a batch run concurrently; the next batch starts only
    /// after the whole batch settled. A failing item never stops the others.
    pub async fn delete_assets(&self, targets: &[AssetRef]) -> BulkDeleteOutcome {
        let mut errors = Vec::new();
        let mut batches = 0;

        for (batch, chunk) in targets.chunks(BULK_BATCH_SIZE).enumerate() {
            batches += 1;
            debug!(batch, size = chunk.len(), "Deleting batch");
            let results = join_all(chunk.iter().map(|target| self.delete_one(target))).await;
            let failed = results.iter().filter(|r| r.is_err()).count();
            errors.extend(results.into_iter().filter_map(Result::err));
            if failed > 0 {
                warn!(batch, failed, "Batch finished with failures");
            }
        }

        let deleted = targets.len() - errors.len();
        info!(deleted, failed = errors.len(), batches, "Bulk delete finished");

        if errors.is_empty() {
            BulkDeleteOutcome {
                status_code: STATUS_OK,
                deleted,
                batches,
                errors,
                message: None,
            }
        } else {
            BulkDeleteOutcome {
                status_code: STATUS_FAILED,
                deleted,
                batches,
                message: Some(format!("Failed to delete {} bare metal asset(s)", errors.len())),
                errors,
            }
        }
    }

    async fn delete_one(&self, target: &AssetRef) -> Result<(), ItemFailure> {
        let path = self.paths.asset(&target.namespace, &target.name);
        match self.api.delete(&path).await {
            Ok(reply) => match delete_failure(&reply) {
                None => Ok(()),
                Some((status_code, message)) => Err(ItemFailure {
                    target: target.clone(),
                    status_code,
                    message,
                }),
            },
            Err(err) => Err(ItemFailure {
                target: target.clone(),
                status_code: STATUS_FAILED,
                message: err.to_string(),
            }),
        }
    }
}

/// A delete reply fails on a non-2xx code or a `Failure` status.
fn delete_failure(reply: &Value) -> Option<(u16, String)> {
    let code = reply
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok());
    let failed_status = reply.get("status").and_then(Value::as_str) == Some("Failure");
    let bad_code = code.is_some_and(|code| !(200..300).contains(&code));
    if !failed_status && !bad_code {
        return None;
    }

    let message = reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("delete failed")
        .to_string();
    Some((code.unwrap_or(STATUS_FAILED), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_input_is_rejected() {
        let err = parse_targets(&json!({"namespace": "a", "name": "b"})).unwrap_err();
        assert!(matches!(err, OrchestrationError::InputInvalid { ref reason } if reason == "Array of assets is expected"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn entries_need_both_fields() {
        assert!(parse_targets(&json!([{"namespace": "a"}])).is_err());
        let targets = parse_targets(&json!([{"namespace": "a", "name": "b"}])).unwrap();
        assert_eq!(targets, vec![AssetRef::new("a", "b")]);
    }

    #[test]
    fn delete_failure_reads_status_objects() {
        assert_eq!(delete_failure(&json!({"kind": "Status", "status": "Success"})), None);
        assert_eq!(
            delete_failure(&json!({"status": "Failure", "code": 404, "message": "gone"})),
            Some((404, "gone".to_string()))
        );
        assert_eq!(delete_failure(&json!({"code": 500})).map(|f| f.0), Some(500));
    }
}
