//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  poller / provisioner / │
//!     ┌──────────────┤  aggregator             ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Work   │            │  Resource   │              │ Dashboard │
//! │ Manager │            │     API     │              │   Query   │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`WorkManager`] - Work submission, progress and direct search
//! - [`ResourceApi`] - Path-addressed get/create/patch/delete
//! - [`DashboardQuery`] - One list-valued data source for the dashboard

pub mod outbound;

pub use outbound::query::DashboardQuery;
pub use outbound::resource::{PatchOp, ResourceApi};
pub use outbound::work::{SearchQuery, StatusReply, SubmitReply, WorkManager};
