//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`work`] - `ScriptedWorkManager`, a [`WorkManager`](crate::port::WorkManager)
//!   answering from a queue of progress envelopes.
//! - [`resource`] - `FakeResourceApi`, an in-memory resource API that
//!   records calls and tracks concurrency.
//! - [`query`] - Canned [`DashboardQuery`](crate::port::DashboardQuery) sources.
//! - [`domain`] - Builders for domain inputs and remote payloads.
//! - [`config`] - A configuration with test-friendly timings.

pub mod config;
pub mod domain;
pub mod query;
pub mod resource;
pub mod work;
