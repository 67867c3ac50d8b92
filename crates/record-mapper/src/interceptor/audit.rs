//! Audit-field stamping before write statements.

use std::sync::Arc;

use crate::core::registry::MetadataRegistry;
use crate::core::{FieldValue, Record};
use crate::error::Result;

/// Supplies the acting identity for audit stamping.
///
/// Implementations typically read a request-scoped authentication context.
/// Must be safe to call once per write statement from whatever thread the
/// hosting pipeline uses.
pub trait ActorSupplier: Send + Sync {
    /// Current actor identity (e.g. a numeric user id).
    ///
    /// Errors propagate unmodified to the caller and abort the write.
    fn current_actor(&self) -> Result<i64>;
}

/// Write interceptor that stamps audit-marked fields with the current actor.
pub struct AuditStamper {
    supplier: Arc<dyn ActorSupplier>,
}

impl AuditStamper {
    /// Create a stamper over the given actor supplier.
    pub fn new(supplier: Arc<dyn ActorSupplier>) -> Self {
        Self { supplier }
    }

    /// Hook point: runs immediately before a write statement is dispatched.
    ///
    /// Overwrites every created-by and modified-by field of the record with
    /// the supplier's current identity, mutating the record in place. The
    /// supplier is consulted lazily and at most once per call; a type with
    /// no audit markers is a no-op and never consults it.
    pub fn before_write<R: Record>(
        &self,
        registry: &MetadataRegistry,
        record: &mut R,
    ) -> Result<()> {
        let meta = registry.meta_of::<R>()?;

        let mut actor: Option<i64> = None;
        for field in meta.fields.iter().filter(|f| f.is_audited()) {
            let id = match actor {
                Some(id) => id,
                None => {
                    let id = self.supplier.current_actor()?;
                    actor = Some(id);
                    id
                }
            };
            record.set(field.name, FieldValue::Int(id))?;
        }

        Ok(())
    }
}
