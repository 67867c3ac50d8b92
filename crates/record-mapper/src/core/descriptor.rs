//! Structural record metadata and the traits record types implement.
//!
//! A record type declares its metadata once as a [`RecordMeta`] value: the
//! table binding, the ordered field list, and per-field markers (primary key,
//! encrypted, created-by, modified-by). The declaration is an explicit,
//! registration-time descriptor; there is no runtime reflection and no
//! attribute syntax of our own. Derivation and caching of everything built
//! from the declaration happens in the
//! [`MetadataRegistry`](crate::core::registry::MetadataRegistry).

use super::value::FieldValue;
use crate::error::{MapperError, Result};

/// Semantic kind of a record field.
///
/// The kind matters to the interceptors: transparent decryption only acts on
/// [`FieldKind::Text`] fields, and audit stamping writes integer actor ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    Decimal,
    Text,
    Bytes,
    Uuid,
    DateTime,
    Date,
}

/// Declared metadata for a single record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field name, used verbatim as column name and placeholder name.
    pub name: &'static str,

    /// Semantic kind of the field.
    pub kind: FieldKind,

    /// Whether the field is part of the primary key.
    pub primary_key: bool,

    /// Whether the field holds an encrypted value to be decrypted on read.
    pub encrypted: bool,

    /// Whether the field receives the acting identity on create.
    pub created_by: bool,

    /// Whether the field receives the acting identity on modify.
    pub modified_by: bool,
}

impl FieldMeta {
    /// Create a plain field with no markers.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            encrypted: false,
            created_by: false,
            modified_by: false,
        }
    }

    /// Mark the field as part of the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark the field as encrypted at rest.
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    /// Mark the field as audit created-by.
    pub fn created_by(mut self) -> Self {
        self.created_by = true;
        self
    }

    /// Mark the field as audit modified-by.
    pub fn modified_by(mut self) -> Self {
        self.modified_by = true;
        self
    }

    /// Whether any audit marker is present.
    #[must_use]
    pub fn is_audited(&self) -> bool {
        self.created_by || self.modified_by
    }
}

/// Declared structural metadata for a record type.
///
/// Field order is significant: snapshots, selective statements, and
/// decryption batches all iterate fields in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    /// Record type name, used in error messages.
    pub type_name: &'static str,

    /// Declared table binding. Absence is a configuration error as soon as
    /// the type is used in a select or write path.
    pub table: Option<&'static str>,

    /// Ordered field declarations.
    pub fields: Vec<FieldMeta>,
}

impl RecordMeta {
    /// Create metadata for a type with no table binding and no fields.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            table: None,
            fields: Vec::new(),
        }
    }

    /// Declare the table binding.
    pub fn with_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    /// Append a field declaration.
    pub fn field(mut self, field: FieldMeta) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a declared field by name.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the primary-key fields, in declared order.
    pub fn primary_key_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.primary_key)
            .map(|f| f.name)
    }
}

/// A record type participating in statement synthesis and interception.
///
/// Implementations are explicit: the type declares its metadata in [`meta`]
/// and routes field access through [`get`]/[`set`] matches. A typical
/// implementation is a handful of lines per field; hosts that generate code
/// can emit the same shape.
///
/// [`meta`]: Record::meta
/// [`get`]: Record::get
/// [`set`]: Record::set
pub trait Record: Send + 'static {
    /// Declared structural metadata for this type.
    ///
    /// Must be deterministic: the registry may derive it redundantly under
    /// concurrent first access and expects structurally identical results.
    fn meta() -> RecordMeta;

    /// Current value of a declared field.
    ///
    /// Unknown names return [`FieldValue::Null`]; callers iterate declared
    /// fields, so this path is not normally reachable.
    fn get(&self, field: &str) -> FieldValue;

    /// Overwrite a declared field in place.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a field name the type does not
    /// declare.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<()>;

    /// Per-call snapshot of all declared fields in declared order.
    ///
    /// The snapshot drives the selective policy: statement synthesis
    /// includes a field iff its snapshot value is non-null.
    fn snapshot(&self) -> Vec<(&'static str, FieldValue)>
    where
        Self: Sized,
    {
        Self::meta()
            .fields
            .iter()
            .map(|f| (f.name, self.get(f.name)))
            .collect()
    }
}

/// Helper for [`Record::set`] implementations: the error for a field name
/// the type does not declare.
pub fn unknown_field(type_name: &str, field: &str) -> MapperError {
    MapperError::validation(format!(
        "record type {} declares no field named '{}'",
        type_name, field
    ))
}

/// Binds a mapper to the record type it operates on.
///
/// This is the base mapper contract: the associated type carries the
/// generic binding that the registry memoizes per mapper. Hosts define one
/// marker type per mapper and dispatch statement synthesis through it.
pub trait Mapper: 'static {
    /// The record type this mapper reads and writes.
    type Record: Record;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order {
        id: Option<i64>,
        name: Option<String>,
        amount: Option<i64>,
    }

    impl Record for Order {
        fn meta() -> RecordMeta {
            RecordMeta::new("Order")
                .with_table("orders")
                .field(FieldMeta::new("id", FieldKind::Integer).primary_key())
                .field(FieldMeta::new("name", FieldKind::Text))
                .field(FieldMeta::new("amount", FieldKind::Integer))
        }

        fn get(&self, field: &str) -> FieldValue {
            match field {
                "id" => self.id.into(),
                "name" => self.name.clone().into(),
                "amount" => self.amount.into(),
                _ => FieldValue::Null,
            }
        }

        fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
            match (field, value) {
                ("id", FieldValue::Int(v)) => self.id = Some(v),
                ("name", FieldValue::Text(v)) => self.name = Some(v),
                ("amount", FieldValue::Int(v)) => self.amount = Some(v),
                (name, _) if Self::meta().find_field(name).is_none() => {
                    return Err(unknown_field("Order", name));
                }
                _ => {}
            }
            Ok(())
        }
    }

    #[test]
    fn test_field_meta_markers() {
        let field = FieldMeta::new("created_by", FieldKind::Integer).created_by();
        assert!(field.created_by);
        assert!(field.is_audited());
        assert!(!field.primary_key);
        assert!(!field.encrypted);
    }

    #[test]
    fn test_record_meta_primary_key_names() {
        let meta = Order::meta();
        let keys: Vec<_> = meta.primary_key_names().collect();
        assert_eq!(keys, vec!["id"]);
    }

    #[test]
    fn test_record_meta_find_field() {
        let meta = Order::meta();
        assert!(meta.find_field("name").is_some());
        assert!(meta.find_field("missing").is_none());
    }

    #[test]
    fn test_snapshot_preserves_declared_order() {
        let order = Order {
            id: Some(1),
            name: None,
            amount: Some(250),
        };

        let snapshot = order.snapshot();
        let names: Vec<_> = snapshot.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["id", "name", "amount"]);
        assert_eq!(snapshot[0].1, FieldValue::Int(1));
        assert_eq!(snapshot[1].1, FieldValue::Null);
    }

    #[test]
    fn test_set_unknown_field_is_validation_error() {
        let mut order = Order {
            id: None,
            name: None,
            amount: None,
        };
        let err = order.set("missing", FieldValue::Int(1)).unwrap_err();
        assert!(matches!(err, MapperError::Validation(_)));
    }
}
