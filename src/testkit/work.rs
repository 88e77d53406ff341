//! Scripted [`WorkManager`] for poller tests.
//!
//! Submissions answer with a fresh handle unless a rejection is scripted.
//! Each status call pops the next progress envelope; once the queue is
//! drained the last envelope repeats, so "never completes" is a single
//! incomplete entry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use uuid::Uuid;

use super::domain::progress;
use crate::domain::work::{WorkHandle, WorkRequest};
use crate::error::Result;
use crate::port::{SearchQuery, StatusReply, SubmitReply, WorkManager};

pub struct ScriptedWorkManager {
    rejection: Option<Value>,
    statuses: Mutex<VecDeque<String>>,
    last_status: Mutex<String>,
    search_reply: Value,
    status_delay: Duration,
    submitted: Mutex<Vec<WorkRequest>>,
    polls: AtomicU32,
}

impl Default for ScriptedWorkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedWorkManager {
    pub fn new() -> Self {
        Self {
            rejection: None,
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(progress(false, Value::Null)),
            search_reply: Value::Null,
            status_delay: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
        }
    }

    /// Answer every submission with this error payload.
    pub fn rejecting(mut self, error: Value) -> Self {
        self.rejection = Some(error);
        self
    }

    /// Queue raw `RetString` contents for status calls.
    pub fn with_statuses(self, statuses: Vec<String>) -> Self {
        self.statuses.lock().extend(statuses);
        self
    }

    /// `pending` incomplete polls, then a completed envelope with `results`.
    pub fn completing_after(self, pending: usize, results: Value) -> Self {
        let mut statuses = vec![progress(false, Value::Null); pending];
        statuses.push(progress(true, results));
        self.with_statuses(statuses)
    }

    /// Never report completion.
    pub fn never_completing(self) -> Self {
        self.with_statuses(vec![progress(false, Value::Null)])
    }

    pub fn with_search_reply(mut self, reply: Value) -> Self {
        self.search_reply = reply;
        self
    }

    /// Delay every status reply.
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<WorkRequest> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl WorkManager for ScriptedWorkManager {
    async fn submit(&self, request: &WorkRequest) -> Result<SubmitReply> {
        self.submitted.lock().push(request.clone());
        Ok(match &self.rejection {
            Some(error) => SubmitReply::rejected(error.clone()),
            None => SubmitReply::accepted(Uuid::new_v4().to_string()),
        })
    }

    async fn status(&self, _handle: &WorkHandle) -> Result<StatusReply> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }
        let next = self.statuses.lock().pop_front();
        let ret_string = match next {
            Some(status) => {
                *self.last_status.lock() = status.clone();
                status
            }
            None => self.last_status.lock().clone(),
        };
        Ok(StatusReply { ret_string })
    }

    async fn search(&self, query: &SearchQuery) -> Result<Value> {
        if self.search_reply.is_null() {
            return Ok(json!({"type": query.resource_type, "name": query.name}));
        }
        Ok(self.search_reply.clone())
    }
}
