//! Parallel dashboard aggregation.

mod aggregator;
mod groups;
mod section;

pub use aggregator::{DashboardAggregator, STATUS_FAILED, TIMED_OUT};
pub use groups::{
    standard_groups, DashboardSources, CLUSTERS_RESOURCE, CLUSTER_STATUS_RESOURCE, PODS_RESOURCE,
    RELEASES_RESOURCE,
};
pub use section::{CardSpec, ChartSpec, RowTransform, SectionGroup, Subject};
