//! Work items submitted to the remote manager and their results.
//!
//! A [`WorkRequest`] is serialized with the manager's PascalCase field
//! names. The manager answers with a [`WorkHandle`]; once the work
//! completes, its per-cluster [`WorkResult`] is flattened into
//! [`WorkItem`]s, one per resource fragment.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::OrchestrationError;

/// Cluster selection filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterSelector {
    pub names: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub status: Option<Vec<String>>,
}

impl ClusterSelector {
    /// Every healthy cluster (`Names: ["*"]`, `Status: ["healthy"]`).
    #[must_use]
    pub fn all_healthy() -> Self {
        Self {
            names: Some(vec!["*".into()]),
            labels: None,
            status: Some(vec!["healthy".into()]),
        }
    }

    /// Restrict to the named clusters.
    #[must_use]
    pub fn named(names: Vec<String>) -> Self {
        Self {
            names: Some(names),
            ..Self::all_healthy()
        }
    }
}

/// Resource filter applied on each target cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkFilter {
    pub namespaces: String,
    pub status: String,
    pub labels: Option<Vec<String>>,
    pub names: String,
}

/// A unit of asynchronous work for the remote manager.
///
/// Built once and only read afterwards; the poller borrows it for the
/// duration of a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkRequest {
    resource: String,
    src_clusters: ClusterSelector,
    dst_clusters: ClusterSelector,
    #[serde(rename = "ClientID")]
    client_id: String,
    dryrun: bool,
    completed: bool,
    #[serde(rename = "UUID")]
    uuid: String,
    operation: String,
    work: WorkFilter,
    timestamp: DateTime<Utc>,
    next_request: Option<Value>,
    finished_request: Option<Value>,
    description: String,
}

impl WorkRequest {
    /// A `get` request for `resource` on every healthy cluster.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            src_clusters: ClusterSelector::default(),
            dst_clusters: ClusterSelector::all_healthy(),
            client_id: String::new(),
            dryrun: false,
            completed: false,
            uuid: String::new(),
            operation: "get".into(),
            work: WorkFilter::default(),
            timestamp: Utc::now(),
            next_request: None,
            finished_request: None,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_destination(mut self, selector: ClusterSelector) -> Self {
        self.dst_clusters = selector;
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: WorkFilter) -> Self {
        self.work = filter;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dryrun = dry_run;
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Opaque identifier the manager assigns to a submitted work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkHandle(String);

impl WorkHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload reported by one cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterPayload {
    /// Named resource fragments.
    Resources(Map<String, Value>),
    /// Error object (has a `code` field).
    Error(Value),
}

/// Completed work, keyed by originating cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkResult {
    clusters: BTreeMap<String, ClusterPayload>,
}

impl WorkResult {
    /// Decode the manager's `{cluster: {"Results": ...}}` map.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::MalformedResponse`] when the value or
    /// a cluster entry is not shaped as expected.
    pub fn from_value(value: Value) -> Result<Self, OrchestrationError> {
        let Value::Object(entries) = value else {
            return Err(OrchestrationError::MalformedResponse(
                "work results must be an object keyed by cluster".into(),
            ));
        };

        let mut clusters = BTreeMap::new();
        for (cluster, entry) in entries {
            let results = match entry {
                Value::Object(mut fields) => fields.remove("Results").unwrap_or(Value::Null),
                other => {
                    return Err(OrchestrationError::MalformedResponse(format!(
                        "cluster {cluster}: expected object, got {other}"
                    )))
                }
            };
            let payload = match results {
                Value::Null => ClusterPayload::Resources(Map::new()),
                Value::Object(fields) if fields.contains_key("code") => {
                    ClusterPayload::Error(Value::Object(fields))
                }
                Value::Object(fields) => ClusterPayload::Resources(fields),
                other => {
                    return Err(OrchestrationError::MalformedResponse(format!(
                        "cluster {cluster}: unexpected results {other}"
                    )))
                }
            };
            clusters.insert(cluster, payload);
        }
        Ok(Self { clusters })
    }

    /// Number of resource fragments across all non-error clusters.
    pub fn resource_count(&self) -> usize {
        self.clusters
            .values()
            .map(|payload| match payload {
                ClusterPayload::Resources(resources) => resources.len(),
                ClusterPayload::Error(_) => 0,
            })
            .sum()
    }

    /// Annotate every fragment with its cluster and name.
    ///
    /// Error-coded clusters are kept as [`WorkItem::ClusterError`].
    pub fn flatten(self) -> Vec<WorkItem> {
        let mut items = Vec::with_capacity(self.resource_count());
        for (cluster, payload) in self.clusters {
            match payload {
                ClusterPayload::Error(error) => items.push(WorkItem::ClusterError { cluster, error }),
                ClusterPayload::Resources(resources) => {
                    for (name, fields) in resources {
                        let fields = match fields {
                            Value::Object(fields) => fields,
                            other => {
                                let mut map = Map::new();
                                map.insert("value".into(), other);
                                map
                            }
                        };
                        items.push(WorkItem::Resource(ClusterResource {
                            cluster: cluster.clone(),
                            name,
                            fields,
                        }));
                    }
                }
            }
        }
        items
    }
}

/// One resource fragment, annotated with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResource {
    pub cluster: String,
    pub name: String,
    pub fields: Map<String, Value>,
}

/// A flattened work result entry.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkItem {
    Resource(ClusterResource),
    ClusterError { cluster: String, error: Value },
}

impl WorkItem {
    pub fn cluster(&self) -> &str {
        match self {
            WorkItem::Resource(resource) => &resource.cluster,
            WorkItem::ClusterError { cluster, .. } => cluster,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WorkItem::ClusterError { .. })
    }

    /// JSON rendering: the resource's own fields plus `name` and `cluster`.
    pub fn to_value(&self) -> Value {
        match self {
            WorkItem::Resource(resource) => {
                let mut fields = resource.fields.clone();
                fields.insert("name".into(), Value::String(resource.name.clone()));
                fields.insert("cluster".into(), Value::String(resource.cluster.clone()));
                Value::Object(fields)
            }
            WorkItem::ClusterError { error, .. } => error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_target_every_healthy_cluster() {
        let request = WorkRequest::new("pods");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["Resource"], "pods");
        assert_eq!(body["Operation"], "get");
        assert_eq!(body["DstClusters"]["Names"], json!(["*"]));
        assert_eq!(body["DstClusters"]["Status"], json!(["healthy"]));
        assert_eq!(body["SrcClusters"]["Names"], Value::Null);
        assert_eq!(body["Dryrun"], false);
        assert_eq!(body["Completed"], false);
        assert_eq!(body["ClientID"], "");
    }

    #[test]
    fn flatten_annotates_cluster_and_name() {
        let result = WorkResult::from_value(json!({
            "east": {"Results": {"web-1": {"status": "Running"}, "web-2": {"status": "Failed"}}},
            "west": {"Results": {"api-1": {"status": "Running"}}},
        }))
        .unwrap();

        let items = result.flatten();
        assert_eq!(items.len(), 3);
        let first = items[0].to_value();
        assert_eq!(first["cluster"], "east");
        assert_eq!(first["name"], "web-1");
        assert_eq!(first["status"], "Running");
    }

    #[test]
    fn flatten_preserves_count_and_keeps_error_clusters() {
        let result = WorkResult::from_value(json!({
            "a": {"Results": {"x": {}, "y": {}}},
            "b": {"Results": {"code": 500, "message": "unreachable"}},
            "c": {"Results": {"z": {}}},
        }))
        .unwrap();

        assert_eq!(result.resource_count(), 3);
        let items = result.flatten();
        let resources = items.iter().filter(|item| !item.is_error()).count();
        let errors: Vec<_> = items.iter().filter(|item| item.is_error()).collect();
        assert_eq!(resources, 3);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].cluster(), "b");
    }

    #[test]
    fn non_object_results_are_malformed() {
        let err = WorkResult::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, OrchestrationError::MalformedResponse(_)));
    }
}
