//! FFmpeg and yt-dlp CLI layer for the ClipCast pipeline.
//!
//! This crate provides:
//! - An external command runner abstraction, swappable in tests
//! - Filter-graph synthesis for transition compositing (pure, no I/O)
//! - Segment trimming with stream-copy fallback to re-encode
//! - Transition merging of trimmed parts into one highlight
//! - Watermark overlay (image or text)
//! - Source download via yt-dlp
//! - Staging-directory discipline for intermediate artifacts

pub mod command;
pub mod compositor;
pub mod download;
pub mod error;
pub mod merge;
pub mod staging;
pub mod trim;
pub mod watermark;

pub use command::{check_ffmpeg, check_ytdlp, CommandOutput, CommandRunner, SystemRunner};
pub use compositor::{build_transition_graph, TransitionGraph, DEFAULT_TRANSITION_DURATION};
pub use download::download_source;
pub use error::{MediaError, MediaResult};
pub use merge::{build_merge_args, merge_segments};
pub use staging::StagingConfig;
pub use trim::trim_segment;
pub use watermark::{apply_watermark, WatermarkAnchor, WatermarkConfig};
