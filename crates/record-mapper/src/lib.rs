//! # record-mapper
//!
//! Metadata-driven data-access core: synthesizes CRUD SQL statements for
//! arbitrary record types from their declared structural metadata, and
//! pre/post-processes statements through pluggable interceptors:
//!
//! - **Statement synthesis**: select-by-key, selective insert, selective
//!   update, and selective conditional update, with `:name` placeholders
//!   and no per-type boilerplate beyond the metadata declaration
//! - **Audit stamping** before writes: created-by / modified-by fields
//!   receive the current actor identity
//! - **Transparent decryption** after reads: encrypted text fields are
//!   decrypted in bounded batches through a collaborator service
//!
//! Statement execution, connection pooling, and transactions belong to the
//! hosting pipeline; this crate only produces statements and mutates records
//! at the pipeline's hook points.
//!
//! ## Example
//!
//! ```rust
//! use record_mapper::{
//!     FieldKind, FieldMeta, FieldValue, Mapper, MetadataRegistry, Record, RecordMeta,
//!     StatementSynthesizer,
//! };
//!
//! struct Order {
//!     id: Option<i64>,
//!     name: Option<String>,
//! }
//!
//! impl Record for Order {
//!     fn meta() -> RecordMeta {
//!         RecordMeta::new("Order")
//!             .with_table("orders")
//!             .field(FieldMeta::new("id", FieldKind::Integer).primary_key())
//!             .field(FieldMeta::new("name", FieldKind::Text))
//!     }
//!
//!     fn get(&self, field: &str) -> FieldValue {
//!         match field {
//!             "id" => self.id.into(),
//!             "name" => self.name.clone().into(),
//!             _ => FieldValue::Null,
//!         }
//!     }
//!
//!     fn set(&mut self, field: &str, value: FieldValue) -> record_mapper::Result<()> {
//!         match (field, value) {
//!             ("id", FieldValue::Int(v)) => self.id = Some(v),
//!             ("name", FieldValue::Text(v)) => self.name = Some(v),
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct OrderMapper;
//!
//! impl Mapper for OrderMapper {
//!     type Record = Order;
//! }
//!
//! fn main() -> record_mapper::Result<()> {
//!     let registry = MetadataRegistry::new();
//!     let synthesizer = StatementSynthesizer::new(&registry);
//!
//!     let stmt = synthesizer.select_by_key::<OrderMapper>()?;
//!     assert_eq!(stmt.sql, "SELECT * FROM orders WHERE id = :id");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod interceptor;
pub mod statement;

// Re-exports for convenient access
pub use config::MapperConfig;
pub use core::{FieldKind, FieldMeta, FieldValue, Mapper, MetadataRegistry, Record, RecordMeta};
pub use error::{MapperError, Result};
pub use interceptor::{ActorSupplier, AuditStamper, CipherProvider, DecryptInterceptor};
pub use statement::{Statement, StatementSynthesizer};
