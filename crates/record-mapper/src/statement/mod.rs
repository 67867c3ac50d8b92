//! CRUD statement synthesis from record metadata.
//!
//! The [`StatementSynthesizer`] turns a mapper type plus (for writes) a
//! record instance into a [`Statement`]: SQL text carrying `:name`
//! placeholders and the ordered list of placeholder names to bind. No data
//! value is ever concatenated into the SQL text; only declared, validated
//! identifiers appear verbatim.

mod synthesizer;

pub use synthesizer::StatementSynthesizer;

/// Placeholder namespace for the condition object in conditional updates.
pub const CONDITION: &str = "condition";

/// Placeholder namespace for the update values in conditional updates.
pub const PARAMETERS: &str = "parameters";

/// A synthesized SQL statement with named placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `:name` placeholders.
    pub sql: String,

    /// Distinct placeholder names in order of first appearance in the text.
    pub parameters: Vec<String>,
}

impl Statement {
    /// Create a statement from SQL text and its placeholder names.
    pub fn new(sql: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }
}
