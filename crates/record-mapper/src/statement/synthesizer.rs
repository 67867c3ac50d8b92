//! The four statement-synthesis operations.

use crate::core::descriptor::Mapper;
use crate::core::registry::MetadataRegistry;
use crate::core::Record;
use crate::error::{MapperError, Result};

use super::{Statement, CONDITION, PARAMETERS};

/// Synthesizes single-table CRUD statements for mapper types.
///
/// Borrows the host-owned [`MetadataRegistry`]; every operation resolves the
/// mapper's record type through the registry, which binds the mapper on
/// first use and memoizes all derived metadata.
pub struct StatementSynthesizer<'a> {
    registry: &'a MetadataRegistry,
}

impl<'a> StatementSynthesizer<'a> {
    /// Create a synthesizer over the given registry.
    pub fn new(registry: &'a MetadataRegistry) -> Self {
        Self { registry }
    }

    /// Build `SELECT * FROM <table> WHERE <key> = :key [AND ...]`.
    ///
    /// The WHERE clause carries one conjunct per primary-key field, in
    /// declared key order.
    pub fn select_by_key<M: Mapper>(&self) -> Result<Statement> {
        self.registry.record_type_of::<M>()?;
        let table = self.registry.table_name::<M::Record>()?;
        let keys = self.registry.primary_keys::<M::Record>()?;

        let conjuncts = keys
            .iter()
            .map(|k| format!("{} = :{}", k, k))
            .collect::<Vec<_>>()
            .join(" AND ");

        let sql = format!("SELECT * FROM {} WHERE {}", table, conjuncts);
        Ok(Statement::new(sql, keys))
    }

    /// Build `INSERT INTO <table> (<cols>) VALUES (:col, ...)` from the
    /// record's provided fields, in snapshot order.
    ///
    /// # Errors
    ///
    /// `Validation` if the record is absent or provides no fields.
    pub fn insert_selective<M: Mapper>(&self, record: Option<&M::Record>) -> Result<Statement> {
        self.registry.record_type_of::<M>()?;
        let record =
            record.ok_or_else(|| MapperError::validation("record is required for insert"))?;
        let table = self.registry.table_name::<M::Record>()?;

        let provided = provided_fields(record);
        if provided.is_empty() {
            return Err(MapperError::validation(format!(
                "insert into {} has no provided fields",
                table
            )));
        }

        let columns = provided.join(", ");
        let values = provided
            .iter()
            .map(|n| format!(":{}", n))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!("INSERT INTO {} ({}) VALUES ({})", table, columns, values);
        let parameters = provided.iter().map(|n| n.to_string()).collect();
        Ok(Statement::new(sql, parameters))
    }

    /// Build `UPDATE <table> SET <col> = :col, ... WHERE <key> = :key ...`
    /// from the record's provided fields.
    ///
    /// The SET clause is selective; the WHERE clause binds each primary-key
    /// field to the placeholder of its own name.
    ///
    /// # Errors
    ///
    /// `Validation` if the record is absent or provides no fields.
    pub fn update_selective<M: Mapper>(&self, record: Option<&M::Record>) -> Result<Statement> {
        self.registry.record_type_of::<M>()?;
        let record =
            record.ok_or_else(|| MapperError::validation("record is required for update"))?;
        let table = self.registry.table_name::<M::Record>()?;
        let keys = self.registry.primary_keys::<M::Record>()?;

        let provided = provided_fields(record);
        if provided.is_empty() {
            return Err(MapperError::validation(format!(
                "update of {} has no provided fields",
                table
            )));
        }

        let sets = provided
            .iter()
            .map(|n| format!("{} = :{}", n, n))
            .collect::<Vec<_>>()
            .join(", ");
        let wheres = keys
            .iter()
            .map(|k| format!("{} = :{}", k, k))
            .collect::<Vec<_>>()
            .join(" AND ");

        let sql = format!("UPDATE {} SET {} WHERE {}", table, sets, wheres);

        // Placeholders are shared by name, so a key that also appears in the
        // SET clause binds once.
        let mut parameters: Vec<String> = provided.iter().map(|n| n.to_string()).collect();
        for key in keys {
            if !parameters.contains(&key) {
                parameters.push(key);
            }
        }
        Ok(Statement::new(sql, parameters))
    }

    /// Build a conditional update: SET from the record's provided fields
    /// under the `parameters.` namespace, WHERE from the primary keys plus
    /// every provided field of the condition object under the `condition.`
    /// namespace.
    ///
    /// The two namespaces keep same-named fields of the two objects from
    /// colliding in one statement. A field that is both a primary key and
    /// provided on the condition contributes a single conjunct.
    ///
    /// # Errors
    ///
    /// `Validation` if the record or the condition is absent, or the record
    /// provides no fields.
    pub fn update_selective_conditional<M: Mapper>(
        &self,
        condition: Option<&M::Record>,
        record: Option<&M::Record>,
    ) -> Result<Statement> {
        self.registry.record_type_of::<M>()?;
        let record = record
            .ok_or_else(|| MapperError::validation("record is required for conditional update"))?;
        let condition = condition.ok_or_else(|| {
            MapperError::validation("condition is required for conditional update")
        })?;
        let table = self.registry.table_name::<M::Record>()?;
        let keys = self.registry.primary_keys::<M::Record>()?;

        let provided = provided_fields(record);
        if provided.is_empty() {
            return Err(MapperError::validation(format!(
                "conditional update of {} has no provided fields",
                table
            )));
        }

        let sets = provided
            .iter()
            .map(|n| format!("{} = :{}.{}", n, PARAMETERS, n))
            .collect::<Vec<_>>()
            .join(", ");
        let mut parameters: Vec<String> = provided
            .iter()
            .map(|n| format!("{}.{}", PARAMETERS, n))
            .collect();

        let mut conjuncts: Vec<String> = Vec::with_capacity(keys.len());
        let mut where_fields: Vec<&str> = Vec::with_capacity(keys.len());
        for key in &keys {
            conjuncts.push(format!("{} = :{}.{}", key, CONDITION, key));
            parameters.push(format!("{}.{}", CONDITION, key));
            where_fields.push(key.as_str());
        }
        for name in provided_fields(condition) {
            if where_fields.contains(&name) {
                continue;
            }
            conjuncts.push(format!("{} = :{}.{}", name, CONDITION, name));
            parameters.push(format!("{}.{}", CONDITION, name));
            where_fields.push(name);
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            sets,
            conjuncts.join(" AND ")
        );
        Ok(Statement::new(sql, parameters))
    }
}

/// Names of the record's provided (non-null) fields, in snapshot order.
fn provided_fields<R: Record>(record: &R) -> Vec<&'static str> {
    record
        .snapshot()
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, _)| name)
        .collect()
}
