//! Transport-agnostic domain types.

pub mod asset;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod provisioning;
pub mod work;

// Work items
pub use work::{
    ClusterPayload, ClusterResource, ClusterSelector, WorkFilter, WorkHandle, WorkItem,
    WorkRequest, WorkResult,
};

// Health classification
pub use health::{Classifier, Health, HealthTally};

// Provisioning
pub use asset::{AssetRecord, AssetRef, AssetSpec, BmcCredentials};
pub use provisioning::{
    ApiObject, BulkDeleteOutcome, ItemFailure, ProvisioningOutcome, StepKind, StepRecord,
    StepResult, WorkflowKind,
};

// Dashboard
pub use dashboard::{DashboardCard, DashboardChart, DashboardData, SectionError, TableRow};

pub use error::OrchestrationError;
