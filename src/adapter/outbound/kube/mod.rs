//! Resource API adapter.

mod client;

pub use client::KubeClient;
