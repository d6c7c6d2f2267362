//! Column descriptors and semantic column kinds

use std::fmt;

/// Semantic kind of a column, derived from its raw SQL type
///
/// Drives form input, search input, table cell and validation rule selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Any integer type
    Integer,
    /// Fixed point numbers
    Decimal,
    /// Floating point numbers
    Float,
    /// `boolean`, `bool`, `tinyint(1)`
    Boolean,
    /// Short strings (`varchar`, `char`, `uuid`, `enum`)
    String,
    /// Long text
    Text,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// Time of day
    Time,
    /// JSON documents
    Json,
    /// Anything else; rendered like a string
    Other,
}

impl ColumnKind {
    /// Classify a raw SQL type; unrecognised types become [`ColumnKind::Other`]
    ///
    /// # Examples
    ///
    /// ```
    /// use crudgen::metadata::ColumnKind;
    ///
    /// assert_eq!(ColumnKind::from_sql_type("VARCHAR(255)"), ColumnKind::String);
    /// assert_eq!(ColumnKind::from_sql_type("tinyint(1)"), ColumnKind::Boolean);
    /// assert_eq!(ColumnKind::from_sql_type("bigint unsigned"), ColumnKind::Integer);
    /// assert_eq!(ColumnKind::from_sql_type("geometry"), ColumnKind::Other);
    /// ```
    #[must_use]
    pub fn from_sql_type(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.starts_with("tinyint(1)") || lower == "bit(1)" {
            return Self::Boolean;
        }

        let base = lower
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match base {
            "bool" | "boolean" => Self::Boolean,
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2"
            | "int4" | "int8" | "serial" | "smallserial" | "bigserial" | "year" => Self::Integer,
            "decimal" | "numeric" | "money" => Self::Decimal,
            "float" | "float4" | "float8" | "double" | "real" => Self::Float,
            "text" | "tinytext" | "mediumtext" | "longtext" | "clob" => Self::Text,
            "char" | "character" | "varchar" | "nchar" | "nvarchar" | "varying" | "string"
            | "citext" | "uuid" | "enum" => Self::String,
            "date" => Self::Date,
            "datetime" | "timestamp" | "timestamptz" => Self::DateTime,
            "time" | "timetz" => Self::Time,
            "json" | "jsonb" => Self::Json,
            _ => Self::Other,
        }
    }

    /// Short type tag, as used in migration field specs
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::String | Self::Other => "string",
            Self::Text => "text",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Json => "json",
        }
    }

    /// Whether values of this kind are free-form text
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text | Self::Other)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Target of a foreign key column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    /// Referenced table
    pub table: String,
    /// Referenced column
    pub column: String,
}

/// Metadata for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Raw SQL type as reported by the source
    pub data_type: String,
    /// Semantic kind derived from `data_type`
    pub kind: ColumnKind,
    /// Whether NULL is allowed
    pub nullable: bool,
    /// Whether the column is (part of) the primary key
    pub primary_key: bool,
    /// Referenced table and column, if any
    pub foreign_key: Option<ForeignKey>,
}

impl ColumnDescriptor {
    /// A non-null, non-key column of the given SQL type
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            kind: ColumnKind::from_sql_type(&data_type),
            data_type,
            nullable: false,
            primary_key: false,
            foreign_key: None,
        }
    }

    /// Set nullability
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Declare a foreign key
    #[must_use]
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Whether the column references another table
    #[must_use]
    pub const fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }

    /// Framework-managed timestamp columns
    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self.name.as_str(),
            "created_at" | "updated_at" | "deleted_at"
        )
    }

    /// Whether the column appears in create/edit forms
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.primary_key && !self.is_timestamp()
    }
}

/// Columns of a table in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns(Vec<ColumnDescriptor>);

impl Columns {
    /// Empty column list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a column, replacing an existing column of the same name in place
    pub fn push(&mut self, column: ColumnDescriptor) {
        if let Some(existing) = self.0.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            self.0.push(column);
        }
    }

    /// Look up a column by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.0.iter().find(|c| c.name == name)
    }

    /// Whether a column exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.0.iter()
    }

    /// Column names in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.name.as_str()).collect()
    }

    /// First primary key column
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnDescriptor> {
        self.0.iter().find(|c| c.primary_key)
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColumnDescriptor> {
        self.0.iter_mut()
    }
}

impl FromIterator<ColumnDescriptor> for Columns {
    fn from_iter<T: IntoIterator<Item = ColumnDescriptor>>(iter: T) -> Self {
        let mut columns = Self::new();
        for column in iter {
            columns.push(column);
        }
        columns
    }
}

impl IntoIterator for Columns {
    type Item = ColumnDescriptor;
    type IntoIter = std::vec::IntoIter<ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let cases = [
            ("integer", ColumnKind::Integer),
            ("INT(10) UNSIGNED", ColumnKind::Integer),
            ("bigserial", ColumnKind::Integer),
            ("numeric(8,2)", ColumnKind::Decimal),
            ("double precision", ColumnKind::Float),
            ("boolean", ColumnKind::Boolean),
            ("TINYINT(1)", ColumnKind::Boolean),
            ("tinyint(4)", ColumnKind::Integer),
            ("character varying", ColumnKind::String),
            ("longtext", ColumnKind::Text),
            ("date", ColumnKind::Date),
            ("timestamp without time zone", ColumnKind::DateTime),
            ("datetime", ColumnKind::DateTime),
            ("time", ColumnKind::Time),
            ("jsonb", ColumnKind::Json),
            ("", ColumnKind::Other),
            ("point", ColumnKind::Other),
        ];
        for (raw, expected) in cases {
            assert_eq!(ColumnKind::from_sql_type(raw), expected, "type {raw:?}");
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(ColumnKind::Integer.tag(), "int");
        assert_eq!(ColumnKind::Other.tag(), "string");
        assert_eq!(ColumnKind::DateTime.to_string(), "datetime");
    }

    #[test]
    fn test_columns_preserve_order_and_replace_in_place() {
        let mut columns: Columns = [
            ColumnDescriptor::new("id", "integer").primary_key(),
            ColumnDescriptor::new("title", "varchar"),
            ColumnDescriptor::new("body", "text"),
        ]
        .into_iter()
        .collect();
        columns.push(ColumnDescriptor::new("title", "text").nullable(true));

        assert_eq!(columns.names(), vec!["id", "title", "body"]);
        assert_eq!(columns.get("title").map(|c| c.kind), Some(ColumnKind::Text));
        assert_eq!(columns.primary_key().map(|c| c.name.as_str()), Some("id"));
        assert!(!columns.contains("missing"));
    }

    #[test]
    fn test_editable_columns() {
        assert!(!ColumnDescriptor::new("id", "integer").primary_key().is_editable());
        assert!(!ColumnDescriptor::new("updated_at", "timestamp").is_editable());
        assert!(ColumnDescriptor::new("user_id", "integer")
            .references("users", "id")
            .is_editable());
    }
}
