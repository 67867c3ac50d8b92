//! Transparent decryption of encrypted fields after read statements.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::MapperConfig;
use crate::core::descriptor::FieldKind;
use crate::core::registry::MetadataRegistry;
use crate::core::{FieldValue, Record};
use crate::error::Result;

/// Batch decryption collaborator.
///
/// May be called many times per logical query: once per result row and
/// qualifying field batch. Must be safe to share across the hosting
/// pipeline's worker threads.
pub trait CipherProvider: Send + Sync {
    /// Decrypt an ordered batch of ciphertext values.
    ///
    /// Returns plaintext keyed by ciphertext. Entries may be omitted for
    /// values the provider cannot decrypt; omitted entries degrade to an
    /// empty string at write-back rather than failing the call. A failed
    /// invocation aborts the remaining decryption for the call.
    fn decrypt(&self, values: &[String]) -> Result<HashMap<String, String>>;
}

/// Read interceptor that replaces encrypted field values with plaintext.
pub struct DecryptInterceptor {
    provider: Arc<dyn CipherProvider>,
    batch_size: usize,
}

impl DecryptInterceptor {
    /// Create an interceptor over the given provider, batching per the
    /// configured `decrypt_batch_size`.
    pub fn new(provider: Arc<dyn CipherProvider>, config: &MapperConfig) -> Self {
        Self {
            provider,
            batch_size: config.decrypt_batch_size.max(1),
        }
    }

    /// Hook point: runs after the pipeline materializes a result list.
    ///
    /// The slice is homogeneous by construction; the field set is derived
    /// from `R` once and applied to every row. Encrypted fields that are not
    /// text are skipped with a warning. Rows are mutated in place; identity
    /// and order of the slice are preserved.
    pub fn after_read<R: Record>(&self, registry: &MetadataRegistry, rows: &mut [R]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let meta = registry.meta_of::<R>()?;
        let fields: Vec<&'static str> = meta
            .fields
            .iter()
            .filter(|f| f.encrypted)
            .filter(|f| {
                if f.kind == FieldKind::Text {
                    true
                } else {
                    warn!(
                        field = f.name,
                        kind = ?f.kind,
                        record_type = meta.type_name,
                        "encrypted marker on non-text field ignored"
                    );
                    false
                }
            })
            .map(|f| f.name)
            .collect();

        if fields.is_empty() {
            return Ok(());
        }

        for row in rows.iter_mut() {
            for batch in fields.chunks(self.batch_size) {
                self.decrypt_batch(row, batch)?;
            }
        }

        Ok(())
    }

    fn decrypt_batch<R: Record>(&self, row: &mut R, batch: &[&'static str]) -> Result<()> {
        // Field name -> current ciphertext for this row. Fields whose current
        // value is not provided have no ciphertext and are left untouched.
        let mut pairs: Vec<(&'static str, String)> = Vec::with_capacity(batch.len());
        for &name in batch {
            if let FieldValue::Text(value) = row.get(name) {
                pairs.push((name, value));
            }
        }
        if pairs.is_empty() {
            return Ok(());
        }

        // Distinct ciphertexts in first-seen order; fields sharing a value
        // collapse to one lookup.
        let mut values: Vec<String> = Vec::with_capacity(pairs.len());
        for (_, ciphertext) in &pairs {
            if !values.contains(ciphertext) {
                values.push(ciphertext.clone());
            }
        }

        let decrypted = self.provider.decrypt(&values)?;

        for (name, ciphertext) in pairs {
            let plaintext = match decrypted.get(&ciphertext) {
                Some(plaintext) => plaintext.clone(),
                None => {
                    debug!(field = name, "no plaintext for ciphertext, substituting empty string");
                    String::new()
                }
            };
            row.set(name, FieldValue::Text(plaintext))?;
        }

        Ok(())
    }
}
