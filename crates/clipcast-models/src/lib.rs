//! Shared data models for the ClipCast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Job and source-video identifiers
//! - Clip segments and merge descriptors
//! - Transition styles and their encoder effect mapping
//! - OAuth token sets
//! - Upload metadata for publishing

pub mod job;
pub mod segment;
pub mod source;
pub mod token;
pub mod transition;
pub mod upload;

// Re-export common types
pub use job::{ClipJob, JobId};
pub use segment::{MergeSource, Segment, SegmentError};
pub use source::SourceId;
pub use token::TokenSet;
pub use transition::{TransitionStyle, UnknownTransition};
pub use upload::{PrivacyStatus, UploadMetadata};
