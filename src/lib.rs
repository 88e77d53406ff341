//! Fleetline - orchestration client for a fleet of remote clusters.
//!
//! Three orchestration patterns sit behind one contract: race a remote
//! operation against a deadline, then classify the outcome.
//!
//! # Architecture
//!
//! - **`application::work`** - submit a work item and poll it to completion
//!   under a deadline (`WorkPoller`)
//! - **`application::provisioning`** - dependent multi-step resource
//!   workflows and batched bulk delete (`AssetProvisioner`)
//! - **`application::dashboard`** - concurrent, individually time-bounded
//!   queries merged into a ranked health overview (`DashboardAggregator`)
//!
//! # Modules
//!
//! - [`domain`] - Transport-agnostic types and the failure taxonomy
//! - [`port`] - Traits the application depends on
//! - [`application`] - The orchestration services
//! - [`adapter`] - HTTP clients and the CLI
//! - [`infrastructure`] - Configuration and service wiring
//! - [`error`] - Crate-level error types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fleetline::adapter::outbound::hcm::HcmClient;
//! use fleetline::application::work::{PollSettings, WorkPoller};
//! use fleetline::domain::WorkRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Arc::new(HcmClient::new("http://localhost:8080", None));
//! let poller = WorkPoller::new(manager, PollSettings::default());
//! let pods = poller.submit_and_await(&WorkRequest::new("pods")).await?;
//! println!("{} pods", pods.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
