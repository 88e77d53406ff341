//! In-memory [`ResourceApi`] for provisioning tests.
//!
//! Unscripted calls behave like a permissive server: creates echo the body
//! back with a name (resolving `generateName`) and a uid, patches echo the
//! last path segment as the name, deletes succeed, and gets of unknown
//! paths return a 404 status object. Scripted replies for a
//! `(method, path)` pair take precedence and are consumed in order.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::port::{PatchOp, ResourceApi};

/// Suffix appended to `generateName` prefixes.
pub const GENERATED_SUFFIX: &str = "x7k2q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Create,
    Patch,
    Delete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

enum Scripted {
    Reply(Value),
    Unreachable(String),
}

#[derive(Default)]
pub struct FakeResourceApi {
    scripted: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    stored: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<Call>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeResourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, so concurrent calls overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Serve `value` for gets of `path` until overwritten.
    pub fn store(self, path: impl Into<String>, value: Value) -> Self {
        self.stored.lock().insert(path.into(), value);
        self
    }

    /// Queue a reply for the next `method` call on `path`.
    pub fn respond(self, method: Method, path: impl Into<String>, reply: Value) -> Self {
        self.push(method, path.into(), Scripted::Reply(reply));
        self
    }

    /// Make the next `method` call on `path` fail without a reply.
    pub fn unreachable(self, method: Method, path: impl Into<String>) -> Self {
        self.push(method, path.into(), Scripted::Unreachable("connection refused".into()));
        self
    }

    fn push(&self, method: Method, path: String, scripted: Scripted) {
        self.scripted
            .lock()
            .entry((method, path))
            .or_default()
            .push_back(scripted);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_of(&self, method: Method) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .cloned()
            .collect()
    }

    /// Highest number of calls that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn handle(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        self.calls.lock().push(Call {
            method,
            path: path.to_string(),
            body: body.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.reply(method, path, body);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }

    fn reply(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let scripted = self
            .scripted
            .lock()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Scripted::Reply(value)) => return Ok(value),
            Some(Scripted::Unreachable(message)) => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    message,
                )))
            }
            None => {}
        }

        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Ok(match method {
            Method::Get => self
                .stored
                .lock()
                .get(path)
                .cloned()
                .unwrap_or_else(|| json!({"kind": "Status", "code": 404, "message": "not found"})),
            Method::Create => {
                let mut created = body.unwrap_or_else(|| json!({}));
                let generated = created
                    .pointer("/metadata/generateName")
                    .and_then(Value::as_str)
                    .map(|prefix| format!("{prefix}{GENERATED_SUFFIX}"));
                if let Some(metadata) = created.get_mut("metadata").and_then(Value::as_object_mut) {
                    if let Some(generated) = generated {
                        metadata.insert("name".into(), Value::String(generated));
                    }
                    let uid = format!("uid-{}", metadata.get("name").and_then(Value::as_str).unwrap_or("anon"));
                    metadata.insert("uid".into(), Value::String(uid));
                }
                created
            }
            Method::Patch => json!({"metadata": {"name": name}, "patch": body}),
            Method::Delete => json!({"kind": "Status", "status": "Success", "details": {"name": name}}),
        })
    }
}

#[async_trait]
impl ResourceApi for FakeResourceApi {
    async fn get(&self, path: &str) -> Result<Value> {
        self.handle(Method::Get, path, None).await
    }

    async fn create(&self, path: &str, body: &Value) -> Result<Value> {
        self.handle(Method::Create, path, Some(body.clone())).await
    }

    async fn patch(&self, path: &str, ops: &[PatchOp]) -> Result<Value> {
        let body = serde_json::to_value(ops)?;
        self.handle(Method::Patch, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.handle(Method::Delete, path, None).await
    }
}
