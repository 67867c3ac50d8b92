//! Write and read interceptors for the hosting execution pipeline.
//!
//! The pipeline calls [`AuditStamper::before_write`] immediately before a
//! write statement is dispatched, and [`DecryptInterceptor::after_read`]
//! after a read statement's result list is materialized. Both mutate their
//! arguments in place and consume the host-owned
//! [`MetadataRegistry`](crate::core::MetadataRegistry) by reference.

pub mod audit;
pub mod decrypt;

pub use audit::{ActorSupplier, AuditStamper};
pub use decrypt::{CipherProvider, DecryptInterceptor};
