//! S3-compatible object storage client (Cloudflare R2).
//!
//! The pipeline's object-storage collaborator: upload a file under a key,
//! get back a public URL. Optional — the worker only constructs it when the
//! bucket and credentials are configured.

pub mod client;
pub mod error;

pub use client::{ObjectStore, StorageConfig};
pub use error::{StorageError, StorageResult};
