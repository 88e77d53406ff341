//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the remote collaborators: the work manager,
//! the resource API, and dashboard data sources.

pub mod query;
pub mod resource;
pub mod work;
