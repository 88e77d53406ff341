//! Work submission and completion polling.

pub mod poller;
pub mod query;

pub use poller::{PollSettings, WorkPoller};
pub use query::WorkQuery;
