//! Work manager REST client.
//!
//! - `POST {base}/api/v1alpha1/work` submits a work item
//! - `GET {base}/api/v1alpha1/work/{id}` reports its progress
//! - `GET {base}/api/v1alpha1/{type}/{name}` runs a direct search

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::domain::work::{WorkHandle, WorkRequest};
use crate::error::{Error, Result};
use crate::port::{SearchQuery, StatusReply, SubmitReply, WorkManager};

const API_PREFIX: &str = "api/v1alpha1";

/// HTTP client for the work manager.
#[derive(Debug, Clone)]
pub struct HcmClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl HcmClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Like [`Self::new`] with a per-request timeout on the HTTP client.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            ..Self::new(base_url, token)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}/{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Default body of a direct search, with `overrides` merged on top.
    fn search_body(query: &SearchQuery) -> Value {
        let mut body = json!({
            "Names": ["*"],
            "Labels": null,
            "Status": ["healthy"],
            "User": "",
            "Resource": "repo",
            "Operation": "search",
            "ID": query.name,
            "Action": {"Name": query.name, "URL": ""},
        });
        if let Value::Object(map) = &mut body {
            map.extend(query.overrides.clone());
        }
        body
    }
}

/// Decode a JSON body whatever the HTTP status; the manager reports
/// failures inside the body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| Error::Parse(format!("HTTP {status}: {err}")))
}

#[async_trait]
impl WorkManager for HcmClient {
    async fn submit(&self, request: &WorkRequest) -> Result<SubmitReply> {
        let url = self.url("work");
        debug!(url = %url, resource = request.resource(), "Submitting work");
        let response = self.authorized(self.http.post(&url)).json(request).send().await?;
        read_json(response).await
    }

    async fn status(&self, handle: &WorkHandle) -> Result<StatusReply> {
        let url = self.url(&format!("work/{handle}"));
        let response = self.authorized(self.http.get(&url)).send().await?;
        read_json(response).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Value> {
        let url = self.url(&format!("{}/{}", query.resource_type, query.name));
        debug!(url = %url, "Searching");
        let response = self
            .authorized(self.http.get(&url))
            .json(&Self::search_body(query))
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        let mut envelope: Value = serde_json::from_str(&reply.ret_string)?;
        Ok(envelope.get_mut("Result").map(Value::take).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_under_the_api_prefix() {
        let client = HcmClient::new("http://hcm:8080/", None);
        assert_eq!(client.url("work"), "http://hcm:8080/api/v1alpha1/work");
        assert_eq!(client.url("work/abc"), "http://hcm:8080/api/v1alpha1/work/abc");
    }

    #[test]
    fn search_body_merges_overrides() {
        let mut query = SearchQuery::new("repo", "stable");
        query.overrides.insert("Resource".into(), json!("chart"));
        let body = HcmClient::search_body(&query);
        assert_eq!(body["Resource"], "chart");
        assert_eq!(body["ID"], "stable");
        assert_eq!(body["Action"]["Name"], "stable");
        assert_eq!(body["Operation"], "search");
    }
}
