//! Column metadata sources
//!
//! The generator reads table structure through the [`MetadataSource`] trait.
//! This crate ships an in-memory source ([`StaticMetadata`]) and a TOML schema
//! file loader ([`SchemaFile`]); the CLI adds a live database source.

mod column;
mod schema_file;

pub use column::{ColumnDescriptor, ColumnKind, Columns, ForeignKey};
pub use schema_file::{ColumnSpec, SchemaFile, TableSpec};

use crate::naming::Inflections;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Metadata lookup failures
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The table does not exist in the source
    #[error("table '{table}' does not exist")]
    TableNotFound {
        /// Requested table
        table: String,
    },

    /// Schema file could not be read
    #[error("failed to read schema file {path}: {source}")]
    Io {
        /// Schema file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Schema file is not valid
    #[error("invalid schema file {path}: {source}")]
    InvalidSchema {
        /// Schema file path
        path: PathBuf,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// The backing store failed to answer
    #[error("metadata query for '{table}' failed: {source}")]
    Backend {
        /// Table being inspected
        table: String,
        /// Driver error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Read access to table structure
pub trait MetadataSource {
    /// Columns of `table` in declaration order
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::TableNotFound`] if the table does not exist,
    /// or a backend error if the source cannot be queried.
    fn fields(&self, table: &str) -> Result<Columns, MetadataError>;

    /// Whether `table` exists
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be queried.
    fn table_exists(&self, table: &str) -> Result<bool, MetadataError>;
}

/// In-memory metadata, keyed by table name
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    tables: BTreeMap<String, Columns>,
}

impl StaticMetadata {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    #[must_use]
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDescriptor>,
    ) -> Self {
        self.insert(name, columns);
        self
    }

    /// Add or replace a table
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDescriptor>,
    ) {
        self.tables
            .insert(name.into(), columns.into_iter().collect());
    }
}

impl MetadataSource for StaticMetadata {
    fn fields(&self, table: &str) -> Result<Columns, MetadataError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| MetadataError::TableNotFound {
                table: table.to_string(),
            })
    }

    fn table_exists(&self, table: &str) -> Result<bool, MetadataError> {
        Ok(self.tables.contains_key(table))
    }
}

/// Treat integer `<x>_id` columns without a declared constraint as
/// references to `plural(x).id`
#[must_use]
pub fn infer_foreign_keys(mut columns: Columns, rules: &dyn Inflections) -> Columns {
    for column in columns.iter_mut() {
        if column.primary_key || column.foreign_key.is_some() || column.kind != ColumnKind::Integer
        {
            continue;
        }
        let Some(stem) = column.name.strip_suffix("_id").filter(|s| !s.is_empty()) else {
            continue;
        };
        let table = rules.plural_phrase(stem);
        tracing::debug!(column = %column.name, %table, "inferred foreign key");
        column.foreign_key = Some(ForeignKey {
            table,
            column: "id".to_string(),
        });
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EnglishInflections;

    fn posts() -> StaticMetadata {
        StaticMetadata::new().with_table(
            "posts",
            [
                ColumnDescriptor::new("id", "integer").primary_key(),
                ColumnDescriptor::new("category_id", "integer"),
                ColumnDescriptor::new("author_id", "integer").references("people", "id"),
                ColumnDescriptor::new("external_id", "varchar(40)"),
                ColumnDescriptor::new("title", "varchar(255)"),
            ],
        )
    }

    #[test]
    fn test_static_metadata_lookup() {
        let source = posts();
        assert!(source.table_exists("posts").unwrap());
        assert!(!source.table_exists("comments").unwrap());
        assert_eq!(source.fields("posts").unwrap().len(), 5);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let err = posts().fields("comments").unwrap_err();
        assert!(matches!(err, MetadataError::TableNotFound { ref table } if table == "comments"));
        assert_eq!(err.to_string(), "table 'comments' does not exist");
    }

    #[test]
    fn test_foreign_key_inference() {
        let columns = infer_foreign_keys(
            posts().fields("posts").unwrap(),
            &EnglishInflections::default(),
        );

        let category = columns.get("category_id").unwrap();
        assert_eq!(
            category.foreign_key,
            Some(ForeignKey {
                table: "categories".to_string(),
                column: "id".to_string()
            })
        );
        assert_eq!(
            columns.get("author_id").unwrap().foreign_key.as_ref().map(|fk| fk.table.as_str()),
            Some("people")
        );
        assert!(!columns.get("external_id").unwrap().is_foreign_key());
        assert!(!columns.get("id").unwrap().is_foreign_key());
    }
}
