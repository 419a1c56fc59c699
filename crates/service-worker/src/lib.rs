//! Offline cache and self update worker for the event manager.
//!
//! On install the asset manifest is cached into a bucket named after the
//! running version, on activate every other bucket is deleted. GET requests are
//! answered from the cache and fall through to the network on a miss. On
//! navigation, or when a page asks, the landing page is fetched and the version
//! stamped into it compared with the running one; if they differ every page is
//! told an update is available.
//!
//! The logic is written against the traits in [`platform`] so it runs on the
//! native target in tests. The browser bindings are only built for wasm32.

mod errors;
mod intercept;
mod lifecycle;
mod message;
pub mod platform;
mod version_watcher;
mod worker;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod test_support;

pub use errors::*;
pub use intercept::FetchHandling;
pub use lifecycle::ActivateReport;
pub use message::MessageOutcome;
pub use version_watcher::VersionCheck;
pub use worker::Worker;
