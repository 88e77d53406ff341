//! The fleet overview: utilization, releases, pods and clusters.

use std::sync::Arc;

use super::section::{CardSpec, RowTransform, SectionGroup, Subject};
use crate::application::work::{WorkPoller, WorkQuery};
use crate::domain::health::Classifier;
use crate::domain::work::WorkRequest;
use crate::port::DashboardQuery;

pub const CLUSTERS_RESOURCE: &str = "clusters";
pub const CLUSTER_STATUS_RESOURCE: &str = "clusterstatuses";
pub const RELEASES_RESOURCE: &str = "releases";
pub const PODS_RESOURCE: &str = "pods";

/// The four queries the standard groups draw from.
#[derive(Clone)]
pub struct DashboardSources {
    pub clusters: Arc<dyn DashboardQuery>,
    pub cluster_status: Arc<dyn DashboardQuery>,
    pub releases: Arc<dyn DashboardQuery>,
    pub pods: Arc<dyn DashboardQuery>,
}

impl DashboardSources {
    /// One work request per source, all submitted through `poller`.
    pub fn from_poller(poller: Arc<WorkPoller>, client_id: &str) -> Self {
        let query = |resource: &str| -> Arc<dyn DashboardQuery> {
            Arc::new(WorkQuery::new(
                Arc::clone(&poller),
                WorkRequest::new(resource).with_client_id(client_id),
            ))
        };
        Self {
            clusters: query(CLUSTERS_RESOURCE),
            cluster_status: query(CLUSTER_STATUS_RESOURCE),
            releases: query(RELEASES_RESOURCE),
            pods: query(PODS_RESOURCE),
        }
    }
}

fn utilization(name: &str, field: &str) -> CardSpec {
    CardSpec::new(name, RowTransform::Percentage(field.to_string()))
        .with_classifier(Classifier::percentage(field))
}

/// Every group paired with the cluster list as its reference query.
pub fn standard_groups(sources: &DashboardSources) -> Vec<SectionGroup> {
    let clusters = &sources.clusters;
    vec![
        SectionGroup::new("utilization", Arc::clone(&sources.cluster_status), Arc::clone(clusters))
            .card(utilization("cpu", "cpuUtilization"))
            .card(utilization("memory", "memoryUtilization"))
            .card(utilization("storage", "storageUtilization")),
        SectionGroup::new("releases", Arc::clone(&sources.releases), Arc::clone(clusters))
            .card(CardSpec::new("helm releases", RowTransform::Release).with_kind("releases")),
        SectionGroup::new("pods", Arc::clone(&sources.pods), Arc::clone(clusters))
            .card(CardSpec::new("pods", RowTransform::Pod).with_kind("pods")),
        SectionGroup::new("clusters", Arc::clone(&sources.cluster_status), Arc::clone(clusters)).card(
            CardSpec::new("clusters", RowTransform::Cluster)
                .with_kind("clusters")
                .with_subject(Subject::Reference),
        ),
    ]
}
