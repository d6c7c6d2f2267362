//! TOML schema files as an offline metadata source
//!
//! ```toml
//! [[tables]]
//! name = "posts"
//!
//! [[tables.columns]]
//! name = "id"
//! type = "integer"
//! primary_key = true
//!
//! [[tables.columns]]
//! name = "user_id"
//! type = "integer"
//! references = "users.id"
//! ```

use super::{ColumnDescriptor, MetadataError, StaticMetadata};
use serde::Deserialize;
use std::path::Path;

/// Parsed schema file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFile {
    /// Tables in file order
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

/// One table of a schema file
#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

/// One column of a schema file
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Raw SQL type
    #[serde(rename = "type", default = "default_type")]
    pub data_type: String,
    /// Whether NULL is allowed
    #[serde(default)]
    pub nullable: bool,
    /// Whether this is the primary key
    #[serde(default)]
    pub primary_key: bool,
    /// `table` or `table.column`
    #[serde(default)]
    pub references: Option<String>,
}

fn default_type() -> String {
    "varchar(255)".to_string()
}

impl SchemaFile {
    /// Read and parse a schema file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid schema.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| MetadataError::InvalidSchema {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse schema TOML
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the input is malformed or does not match the
    /// schema layout.
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Convert to an in-memory metadata source
    #[must_use]
    pub fn into_metadata(self) -> StaticMetadata {
        let mut metadata = StaticMetadata::new();
        for table in self.tables {
            metadata.insert(table.name, table.columns.into_iter().map(ColumnSpec::into_descriptor));
        }
        metadata
    }
}

impl ColumnSpec {
    fn into_descriptor(self) -> ColumnDescriptor {
        let mut column = ColumnDescriptor::new(self.name, self.data_type).nullable(self.nullable);
        if self.primary_key {
            column = column.primary_key();
        }
        if let Some(target) = self.references {
            let (table, referenced) = target.split_once('.').unwrap_or((target.as_str(), "id"));
            column = column.references(table, referenced);
        }
        column
    }
}
