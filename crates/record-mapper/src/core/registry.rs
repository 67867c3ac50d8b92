//! Metadata registry: memoizing caches over record-type declarations.
//!
//! The registry is an explicit value owned by the hosting execution pipeline
//! and passed by reference to the statement synthesizer and the interceptors.
//! There is no global state. Each cache is populated lazily on first access
//! per type and lives for the registry's lifetime; entries are never
//! invalidated.
//!
//! # Concurrency
//!
//! Derivation is a pure function of the type's declared metadata, so
//! concurrent first accesses may derive redundantly; the insert-if-absent
//! population makes the race harmless (all writers insert structurally
//! identical values and the first one wins).

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{MapperError, Result};

use super::descriptor::{Mapper, Record, RecordMeta};
use super::identifier::validate_identifier;

/// Memoizing resolver for table bindings, primary-key sets, and
/// mapper-to-record bindings.
#[derive(Default)]
pub struct MetadataRegistry {
    /// Validated record metadata by record type.
    metas: RwLock<HashMap<TypeId, Arc<RecordMeta>>>,

    /// Resolved table names by record type.
    table_names: RwLock<HashMap<TypeId, String>>,

    /// Resolved primary-key field names by record type, declared order.
    primary_keys: RwLock<HashMap<TypeId, Vec<String>>>,

    /// Record metadata by mapper type.
    mapper_records: RwLock<HashMap<TypeId, Arc<RecordMeta>>>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the validated metadata for a record type.
    ///
    /// Derives and caches on first access. Every declared identifier (table
    /// name and field names) is validated once here.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an invalid identifier or a
    /// duplicate field name in the declaration.
    pub fn meta_of<R: Record>(&self) -> Result<Arc<RecordMeta>> {
        let id = TypeId::of::<R>();

        if let Some(meta) = self.metas.read().expect("metas lock poisoned").get(&id) {
            return Ok(meta.clone());
        }

        let meta = Arc::new(Self::derive_meta(R::meta())?);
        debug!(
            record_type = meta.type_name,
            fields = meta.fields.len(),
            "derived record metadata"
        );

        let mut cache = self.metas.write().expect("metas lock poisoned");
        Ok(cache.entry(id).or_insert(meta).clone())
    }

    /// Resolve the table name a record type is bound to.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the type declares no table binding.
    pub fn table_name<R: Record>(&self) -> Result<String> {
        let id = TypeId::of::<R>();

        if let Some(name) = self
            .table_names
            .read()
            .expect("table_names lock poisoned")
            .get(&id)
        {
            return Ok(name.clone());
        }

        let meta = self.meta_of::<R>()?;
        let table = meta.table.ok_or_else(|| {
            MapperError::configuration(format!(
                "no table binding declared for record type {}",
                meta.type_name
            ))
        })?;

        let mut cache = self.table_names.write().expect("table_names lock poisoned");
        Ok(cache.entry(id).or_insert_with(|| table.to_string()).clone())
    }

    /// Resolve the ordered primary-key field names for a record type.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the type declares no key field.
    pub fn primary_keys<R: Record>(&self) -> Result<Vec<String>> {
        let id = TypeId::of::<R>();

        if let Some(keys) = self
            .primary_keys
            .read()
            .expect("primary_keys lock poisoned")
            .get(&id)
        {
            return Ok(keys.clone());
        }

        let meta = self.meta_of::<R>()?;
        let keys: Vec<String> = meta.primary_key_names().map(str::to_string).collect();
        if keys.is_empty() {
            return Err(MapperError::configuration(format!(
                "no primary-key field declared for record type {}",
                meta.type_name
            )));
        }

        let mut cache = self
            .primary_keys
            .write()
            .expect("primary_keys lock poisoned");
        Ok(cache.entry(id).or_insert(keys).clone())
    }

    /// Resolve the record type a mapper is bound to, binding it on first use.
    ///
    /// The binding is memoized by mapper type so later dynamic lookups via
    /// [`record_type_for_id`](Self::record_type_for_id) succeed.
    pub fn record_type_of<M: Mapper>(&self) -> Result<Arc<RecordMeta>> {
        let id = TypeId::of::<M>();

        if let Some(meta) = self
            .mapper_records
            .read()
            .expect("mapper_records lock poisoned")
            .get(&id)
        {
            return Ok(meta.clone());
        }

        let meta = self.meta_of::<M::Record>()?;

        let mut cache = self
            .mapper_records
            .write()
            .expect("mapper_records lock poisoned");
        Ok(cache.entry(id).or_insert(meta).clone())
    }

    /// Resolve the record type for a mapper by type id.
    ///
    /// Serves hosts that dispatch by type id after the typed path has bound
    /// the mapper.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a mapper that was never bound to
    /// a record type.
    pub fn record_type_for_id(&self, mapper: TypeId) -> Result<Arc<RecordMeta>> {
        self.mapper_records
            .read()
            .expect("mapper_records lock poisoned")
            .get(&mapper)
            .cloned()
            .ok_or_else(|| {
                MapperError::configuration(format!(
                    "mapper {:?} is not bound to a record type",
                    mapper
                ))
            })
    }

    /// Validate a raw declaration into cacheable metadata.
    fn derive_meta(meta: RecordMeta) -> Result<RecordMeta> {
        if let Some(table) = meta.table {
            validate_identifier(table)?;
        }

        for (idx, field) in meta.fields.iter().enumerate() {
            validate_identifier(field.name)?;
            if meta.fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(MapperError::configuration(format!(
                    "record type {} declares field '{}' more than once",
                    meta.type_name, field.name
                )));
            }
        }

        Ok(meta)
    }
}

impl std::fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let metas = self.metas.read().expect("metas lock poisoned");
        f.debug_struct("MetadataRegistry")
            .field(
                "record_types",
                &metas.values().map(|m| m.type_name).collect::<Vec<_>>(),
            )
            .field(
                "bound_mappers",
                &self
                    .mapper_records
                    .read()
                    .expect("mapper_records lock poisoned")
                    .len(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::{unknown_field, FieldKind, FieldMeta};
    use crate::core::value::FieldValue;

    #[derive(Default)]
    struct Order {
        id: Option<i64>,
        name: Option<String>,
    }

    impl Record for Order {
        fn meta() -> RecordMeta {
            RecordMeta::new("Order")
                .with_table("orders")
                .field(FieldMeta::new("id", FieldKind::Integer).primary_key())
                .field(FieldMeta::new("name", FieldKind::Text))
        }

        fn get(&self, field: &str) -> FieldValue {
            match field {
                "id" => self.id.into(),
                "name" => self.name.clone().into(),
                _ => FieldValue::Null,
            }
        }

        fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
            match (field, value) {
                ("id", FieldValue::Int(v)) => self.id = Some(v),
                ("name", FieldValue::Text(v)) => self.name = Some(v),
                (name, _) if Self::meta().find_field(name).is_none() => {
                    return Err(unknown_field("Order", name));
                }
                _ => {}
            }
            Ok(())
        }
    }

    struct OrderMapper;

    impl Mapper for OrderMapper {
        type Record = Order;
    }

    // A type with no table binding and no key field.
    struct Unbound;

    impl Record for Unbound {
        fn meta() -> RecordMeta {
            RecordMeta::new("Unbound").field(FieldMeta::new("value", FieldKind::Text))
        }

        fn get(&self, _field: &str) -> FieldValue {
            FieldValue::Null
        }

        fn set(&mut self, field: &str, _value: FieldValue) -> Result<()> {
            Err(unknown_field("Unbound", field))
        }
    }

    // A type whose declared table name is hostile.
    struct BadTable;

    impl Record for BadTable {
        fn meta() -> RecordMeta {
            RecordMeta::new("BadTable")
                .with_table("orders; DROP TABLE users")
                .field(FieldMeta::new("id", FieldKind::Integer).primary_key())
        }

        fn get(&self, _field: &str) -> FieldValue {
            FieldValue::Null
        }

        fn set(&mut self, field: &str, _value: FieldValue) -> Result<()> {
            Err(unknown_field("BadTable", field))
        }
    }

    #[test]
    fn test_table_name_resolution() {
        let registry = MetadataRegistry::new();
        assert_eq!(registry.table_name::<Order>().unwrap(), "orders");
    }

    #[test]
    fn test_primary_keys_resolution() {
        let registry = MetadataRegistry::new();
        assert_eq!(registry.primary_keys::<Order>().unwrap(), vec!["id"]);
    }

    #[test]
    fn test_memoization_returns_same_meta() {
        let registry = MetadataRegistry::new();
        let first = registry.meta_of::<Order>().unwrap();
        let second = registry.meta_of::<Order>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_table_binding_is_configuration_error() {
        let registry = MetadataRegistry::new();
        let err = registry.table_name::<Unbound>().unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
        assert!(err.to_string().contains("Unbound"));
    }

    #[test]
    fn test_missing_primary_key_is_configuration_error() {
        let registry = MetadataRegistry::new();
        let err = registry.primary_keys::<Unbound>().unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
    }

    #[test]
    fn test_hostile_table_name_is_configuration_error() {
        let registry = MetadataRegistry::new();
        let err = registry.table_name::<BadTable>().unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
    }

    #[test]
    fn test_mapper_binding_and_dynamic_lookup() {
        let registry = MetadataRegistry::new();

        // Unbound mappers are a configuration error on the dynamic path.
        let err = registry
            .record_type_for_id(TypeId::of::<OrderMapper>())
            .unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));

        // The typed path binds the mapper...
        let meta = registry.record_type_of::<OrderMapper>().unwrap();
        assert_eq!(meta.type_name, "Order");

        // ...after which the dynamic path resolves it.
        let found = registry
            .record_type_for_id(TypeId::of::<OrderMapper>())
            .unwrap();
        assert!(Arc::ptr_eq(&meta, &found));
    }

    #[test]
    fn test_concurrent_population_is_idempotent() {
        let registry = Arc::new(MetadataRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let table = registry.table_name::<Order>().unwrap();
                    let keys = registry.primary_keys::<Order>().unwrap();
                    (table, keys)
                })
            })
            .collect();

        for handle in handles {
            let (table, keys) = handle.join().unwrap();
            assert_eq!(table, "orders");
            assert_eq!(keys, vec!["id"]);
        }
    }
}
