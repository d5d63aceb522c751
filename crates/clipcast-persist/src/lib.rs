//! Supabase REST persistence client.
//!
//! The pipeline treats persistence as an optional collaborator: trim-path
//! and highlight-URL writes are best-effort side channels, while token
//! persistence is required when publishing. Dynamic rows coming back from
//! the REST API are converted to typed models at this boundary, with
//! explicit validation.

pub mod client;
pub mod error;
pub mod metrics;
pub mod records;
pub mod repos;

pub use client::{SupabaseClient, SupabaseConfig};
pub use error::{PersistError, PersistResult};
pub use records::{job_from_record, segment_from_record, tokens_from_record};
pub use repos::{JobRepo, SegmentRepo, TokenRepo};
