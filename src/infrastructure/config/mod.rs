//! Configuration sections and loading.

pub mod dashboard;
pub mod kube;
pub mod logging;
pub mod manager;
pub mod settings;

pub use dashboard::DashboardConfig;
pub use kube::KubeConfig;
pub use logging::LoggingConfig;
pub use manager::ManagerConfig;
pub use settings::{Config, DEFAULT_CONFIG_PATH, TOKEN_ENV};
