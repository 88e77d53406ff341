//! Submit a work item and poll the manager until it completes.
//!
//! The poll loop and the deadline timer race each other through
//! [`race_deadline`]. Polls happen on a fixed cadence with at most one
//! status request in flight. Only an incomplete envelope triggers another
//! poll; a reply that cannot be decoded ends the call.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::deadline::race_deadline;
use crate::domain::error::OrchestrationError;
use crate::domain::work::{WorkHandle, WorkItem, WorkRequest, WorkResult};
use crate::port::{SearchQuery, WorkManager};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Poll cadence and overall deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl PollSettings {
    /// Reject settings the poll loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::InputInvalid`] for a zero interval or a
    /// deadline that leaves no room for a single poll.
    pub fn validate(&self) -> Result<(), OrchestrationError> {
        if self.interval.is_zero() {
            return Err(OrchestrationError::InputInvalid {
                reason: "poll interval must be non-zero".into(),
            });
        }
        if self.deadline <= self.interval {
            return Err(OrchestrationError::InputInvalid {
                reason: format!(
                    "deadline {}ms must exceed poll interval {}ms",
                    self.deadline.as_millis(),
                    self.interval.as_millis()
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProgressEnvelope {
    result: WorkProgress,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WorkProgress {
    completed: bool,
    #[serde(default)]
    results: Value,
}

pub struct WorkPoller {
    manager: Arc<dyn WorkManager>,
    settings: PollSettings,
}

impl WorkPoller {
    pub fn new(manager: Arc<dyn WorkManager>, settings: PollSettings) -> Self {
        Self { manager, settings }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Submit `request`, wait for completion, and flatten the result.
    ///
    /// The deadline covers submission and polling together.
    ///
    /// # Errors
    ///
    /// - [`OrchestrationError::InputInvalid`] if the poll settings are unusable,
    ///   before anything is submitted
    /// - [`OrchestrationError::RemoteRejected`] if the manager refuses the submission
    /// - [`OrchestrationError::Timeout`] if the deadline fires first
    /// - [`OrchestrationError::RemoteOperationFailed`] if the completed payload is an error
    /// - [`OrchestrationError::MalformedResponse`] / [`OrchestrationError::Transport`]
    ///   for undecodable replies and unreachable endpoints
    pub async fn submit_and_await(
        &self,
        request: &WorkRequest,
    ) -> Result<Vec<WorkItem>, OrchestrationError> {
        self.settings.validate()?;
        let outcome = race_deadline(self.settings.deadline, async {
            let handle = self.submit(request).await?;
            let result = self.poll_until_complete(&handle).await?;
            Ok::<_, OrchestrationError>(result.flatten())
        })
        .await;

        match &outcome {
            Ok(items) => info!(
                resource = request.resource(),
                items = items.len(),
                "Work completed"
            ),
            Err(err) if err.is_timeout() => warn!(
                resource = request.resource(),
                deadline_ms = self.settings.deadline.as_millis() as u64,
                "Work deadline elapsed, outcome unknown"
            ),
            Err(err) => warn!(resource = request.resource(), error = %err, "Work failed"),
        }
        outcome
    }

    /// Submit `request` and return the manager's handle.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::RemoteRejected`] when the reply carries
    /// an error payload.
    pub async fn submit(&self, request: &WorkRequest) -> Result<WorkHandle, OrchestrationError> {
        let reply = self.manager.submit(request).await?;

        if let Some(error) = reply.error.filter(|error| !error.is_null()) {
            return Err(OrchestrationError::RemoteRejected {
                message: render_error(&error),
            });
        }

        let handle = reply
            .ret_string
            .filter(|id| !id.is_empty())
            .map(WorkHandle::new)
            .ok_or_else(|| {
                OrchestrationError::MalformedResponse("submission reply carried no work id".into())
            })?;

        debug!(work_id = %handle, resource = request.resource(), "Work submitted");
        Ok(handle)
    }

    async fn poll_until_complete(&self, handle: &WorkHandle) -> Result<WorkResult, OrchestrationError> {
        let interval = self.settings.interval;
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls: u32 = 0;
        loop {
            ticker.tick().await;
            polls += 1;

            let reply = self.manager.status(handle).await?;
            let progress = decode_progress(&reply.ret_string)?;
            if !progress.completed {
                debug!(work_id = %handle, polls, "Work not yet completed");
                continue;
            }

            debug!(work_id = %handle, polls, "Work completed");
            return classify_completion(progress.results);
        }
    }

    /// Direct search, bounded by the same deadline.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Timeout`] if the manager does not
    /// answer in time.
    pub async fn search(&self, query: &SearchQuery) -> Result<Value, OrchestrationError> {
        race_deadline(self.settings.deadline, async {
            Ok::<_, OrchestrationError>(self.manager.search(query).await?)
        })
        .await
    }
}

fn decode_progress(raw: &str) -> Result<WorkProgress, OrchestrationError> {
    serde_json::from_str::<ProgressEnvelope>(raw)
        .map(|envelope| envelope.result)
        .map_err(|err| OrchestrationError::MalformedResponse(format!("work status: {err}")))
}

fn classify_completion(results: Value) -> Result<WorkResult, OrchestrationError> {
    let carries_error = |key: &str| results.get(key).is_some_and(is_truthy);
    if carries_error("code") || carries_error("message") {
        return Err(OrchestrationError::from_payload(results));
    }
    WorkResult::from_value(results)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other
            .get("message")
            .or_else(|| other.get("error"))
            .and_then(Value::as_str)
            .map_or_else(|| other.to_string(), str::to_string),
    }
}
