//! Client side of the mock interview: the per-run session state, durable
//! feedback snapshots, a typed client of the proxy routes, and the page flow
//! that ties them together.
//!
//! Every third-party call (speech, transcription) goes through the proxy;
//! this crate never holds a third-party credential.

pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod flow;
pub mod results;
pub mod resume;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use api::ProxyClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::InterviewSession;
pub use storage::{ClientStorage, FileStorage, MemoryStorage, StorageKey};
