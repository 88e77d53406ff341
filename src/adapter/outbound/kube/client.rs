//! Resource API client over plain HTTP.
//!
//! Error statuses are not turned into `Err`: the server's status object is
//! decoded and returned so workflows can read its `code` and `message`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::port::{PatchOp, ResourceApi};

const JSON_PATCH: &str = "application/json-patch+json";

#[derive(Debug, Clone)]
pub struct KubeClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl KubeClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, method: &'static str, builder: RequestBuilder) -> Result<Value> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(method, status = status.as_u16(), "Resource API replied");

        if text.trim().is_empty() {
            return Ok(if status.is_success() {
                Value::Object(serde_json::Map::new())
            } else {
                json!({"code": status.as_u16(), "message": status.to_string()})
            });
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Ok(json!({"code": status.as_u16(), "message": text})),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl ResourceApi for KubeClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.send("GET", self.http.get(self.url(path))).await
    }

    async fn create(&self, path: &str, body: &Value) -> Result<Value> {
        self.send("POST", self.http.post(self.url(path)).json(body)).await
    }

    async fn patch(&self, path: &str, ops: &[PatchOp]) -> Result<Value> {
        let body = serde_json::to_vec(ops)?;
        let builder = self
            .http
            .patch(self.url(path))
            .header(CONTENT_TYPE, JSON_PATCH)
            .body(body);
        self.send("PATCH", builder).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send("DELETE", self.http.delete(self.url(path))).await
    }
}
