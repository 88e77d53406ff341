//! Application services.
//!
//! Each service depends only on outbound ports, so the same orchestration
//! runs against the HTTP adapters or the in-memory fakes in `testkit`.

pub mod dashboard;
pub mod deadline;
pub mod provisioning;
pub mod work;

pub use dashboard::DashboardAggregator;
pub use provisioning::AssetProvisioner;
pub use work::WorkPoller;
