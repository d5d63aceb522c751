//! Redis Streams stage queue.
//!
//! Each pipeline stage is an independently schedulable unit of work carried
//! as a [`StageJob`] payload. Two lanes share the worker pool: a default
//! lane and a priority lane for paid-tier jobs. Lane assignment affects
//! scheduling order only, never semantics.

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::{DownloadJob, HighlightJob, Lane, MergeJob, PublishJob, StageJob, TrimJob};
pub use queue::{MessageHandle, QueueConfig, StageQueue};
