//! Pipeline stage worker.
//!
//! This crate provides:
//! - Stage handlers for download, trim, merge, highlight and publish
//! - A queue-driven executor dispatching stage jobs
//! - Optional-collaborator wiring (persistence, object storage)

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod stages;

pub use config::WorkerConfig;
pub use context::{PersistHandles, StageContext};
pub use error::{WorkerError, WorkerResult};
pub use executor::StageExecutor;
