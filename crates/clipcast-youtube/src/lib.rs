//! OAuth-aware resumable upload client for YouTube publishing.
//!
//! Implements the publisher's protocol half: refresh-if-expiring token
//! handling, the resumable-upload handshake, and unbounded byte streaming
//! to the returned session location. Persisting refreshed tokens and
//! playback URLs stays with the worker's publish stage.

pub mod client;
pub mod error;

pub use client::{PublishOutcome, UploadOutcome, YoutubeClient, YoutubeConfig};
pub use error::{YoutubeError, YoutubeResult};
