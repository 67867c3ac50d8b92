//! Core abstractions for metadata-driven data access.
//!
//! This module provides the foundational types and traits used throughout
//! the mapping core:
//!
//! - [`descriptor`]: Record metadata declarations and the `Record`/`Mapper` traits
//! - [`value`]: Field value representation for snapshots and write-back
//! - [`identifier`]: Identifier validation applied at derivation time
//! - [`registry`]: Memoizing metadata caches, explicitly owned by the host
//!
//! # Architecture
//!
//! Record types declare their structure once; the [`MetadataRegistry`]
//! derives and memoizes everything built from those declarations. The
//! statement synthesizer and the interceptors consume the registry by
//! reference, so the host pipeline stays the single owner of all shared
//! state.

pub mod descriptor;
pub mod identifier;
pub mod registry;
pub mod value;

// Re-export commonly used types for convenience
pub use descriptor::{FieldKind, FieldMeta, Mapper, Record, RecordMeta};
pub use registry::MetadataRegistry;
pub use value::FieldValue;
