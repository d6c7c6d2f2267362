//! Live database introspection
//!
//! Column metadata is read through `sqlx`'s `Any` driver from
//! `information_schema` (`PostgreSQL`, `MySQL`) or table-valued PRAGMA
//! functions (`SQLite`). Every query reports the same row shape so rows are
//! decoded once, whatever the backend.

use crate::DatabaseBackend;
use anyhow::{anyhow, Context, Result};
use crudgen::metadata::{ColumnDescriptor, Columns, MetadataError, MetadataSource};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use std::collections::HashMap;
use tokio::runtime::Runtime;

/// Metadata source backed by a database connection
///
/// Owns a current-thread runtime; every query blocks until it completes.
pub struct DatabaseMetadata {
    runtime: Runtime,
    pool: AnyPool,
    backend: DatabaseBackend,
}

impl std::fmt::Debug for DatabaseMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseMetadata")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl DatabaseMetadata {
    /// Connect to `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the scheme is unsupported or the connection fails.
    pub fn connect(url: &str) -> Result<Self> {
        let backend = DatabaseBackend::from_url(url)
            .ok_or_else(|| anyhow!("unsupported database URL scheme: {url}"))?;

        sqlx::any::install_default_drivers();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start database runtime")?;

        let pool = runtime
            .block_on(AnyPoolOptions::new().max_connections(1).connect(url))
            .with_context(|| format!("Failed to connect to {backend:?} database"))?;

        tracing::debug!(?backend, "connected to database");

        Ok(Self {
            runtime,
            pool,
            backend,
        })
    }

    /// Backend in use
    #[must_use]
    pub const fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    fn fetch(&self, sql: &str, table: &str) -> Result<Vec<AnyRow>, MetadataError> {
        self.runtime
            .block_on(sqlx::query(sql).bind(table.to_string()).fetch_all(&self.pool))
            .map_err(|e| backend_error(table, e))
    }

    fn foreign_keys(&self, table: &str) -> Result<HashMap<String, (String, String)>, MetadataError> {
        self.fetch(foreign_keys_query(self.backend), table)?
            .iter()
            .map(|row| {
                Ok((
                    row.try_get::<String, _>("name")?,
                    (
                        row.try_get::<String, _>("ref_table")?,
                        row.try_get::<String, _>("ref_column")?,
                    ),
                ))
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(|e| backend_error(table, e))
    }
}

impl MetadataSource for DatabaseMetadata {
    fn fields(&self, table: &str) -> Result<Columns, MetadataError> {
        if !self.table_exists(table)? {
            return Err(MetadataError::TableNotFound {
                table: table.to_string(),
            });
        }

        let foreign_keys = self.foreign_keys(table)?;
        let rows = self.fetch(columns_query(self.backend), table)?;
        tracing::debug!(table, columns = rows.len(), "introspected table");

        rows.iter()
            .map(|row| {
                let name: String = row.try_get("name")?;
                let data_type: String = row.try_get("data_type")?;
                let nullable: i64 = row.try_get("is_nullable")?;
                let primary_key: i64 = row.try_get("is_pk")?;

                let mut column = ColumnDescriptor::new(name, data_type).nullable(nullable != 0);
                if primary_key != 0 {
                    column = column.primary_key();
                }
                if let Some((ref_table, ref_column)) = foreign_keys.get(&column.name) {
                    column = column.references(ref_table.as_str(), ref_column.as_str());
                }
                Ok(column)
            })
            .collect::<Result<Columns, sqlx::Error>>()
            .map_err(|e| backend_error(table, e))
    }

    fn table_exists(&self, table: &str) -> Result<bool, MetadataError> {
        let rows = self.fetch(table_exists_query(self.backend), table)?;
        let count = rows
            .first()
            .map(|row| row.try_get::<i64, _>("n"))
            .transpose()
            .map_err(|e| backend_error(table, e))?
            .unwrap_or(0);
        Ok(count > 0)
    }
}

fn backend_error(table: &str, source: sqlx::Error) -> MetadataError {
    MetadataError::Backend {
        table: table.to_string(),
        source: Box::new(source),
    }
}

/// Columns as `name`, `data_type`, `is_nullable`, `is_pk` in declaration order
const fn columns_query(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Sqlite => {
            r#"SELECT name,
                      type AS data_type,
                      CASE WHEN "notnull" = 0 THEN 1 ELSE 0 END AS is_nullable,
                      CASE WHEN pk > 0 THEN 1 ELSE 0 END AS is_pk
               FROM pragma_table_info(?)
               ORDER BY cid"#
        }
        DatabaseBackend::Postgres => {
            r"SELECT CAST(c.column_name AS TEXT) AS name,
                     CAST(c.data_type AS TEXT) AS data_type,
                     CAST(CASE WHEN c.is_nullable = 'YES' THEN 1 ELSE 0 END AS BIGINT) AS is_nullable,
                     CAST(CASE WHEN EXISTS (
                         SELECT 1
                         FROM information_schema.table_constraints tc
                         JOIN information_schema.key_column_usage kcu
                           ON tc.constraint_name = kcu.constraint_name
                          AND tc.table_schema = kcu.table_schema
                         WHERE tc.constraint_type = 'PRIMARY KEY'
                           AND tc.table_schema = c.table_schema
                           AND tc.table_name = c.table_name
                           AND kcu.column_name = c.column_name
                     ) THEN 1 ELSE 0 END AS BIGINT) AS is_pk
              FROM information_schema.columns c
              WHERE c.table_schema = current_schema()
                AND c.table_name = $1
              ORDER BY c.ordinal_position"
        }
        DatabaseBackend::Mysql => {
            r"SELECT CAST(column_name AS CHAR) AS name,
                     CAST(column_type AS CHAR) AS data_type,
                     CAST(CASE WHEN is_nullable = 'YES' THEN 1 ELSE 0 END AS SIGNED) AS is_nullable,
                     CAST(CASE WHEN column_key = 'PRI' THEN 1 ELSE 0 END AS SIGNED) AS is_pk
              FROM information_schema.columns
              WHERE table_schema = DATABASE()
                AND table_name = ?
              ORDER BY ordinal_position"
        }
    }
}

/// Foreign keys as `name`, `ref_table`, `ref_column`
const fn foreign_keys_query(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Sqlite => {
            r#"SELECT "from" AS name, "table" AS ref_table, COALESCE("to", 'id') AS ref_column
               FROM pragma_foreign_key_list(?)"#
        }
        DatabaseBackend::Postgres => {
            r"SELECT CAST(kcu.column_name AS TEXT) AS name,
                     CAST(ccu.table_name AS TEXT) AS ref_table,
                     CAST(ccu.column_name AS TEXT) AS ref_column
              FROM information_schema.table_constraints tc
              JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
               AND tc.table_schema = kcu.table_schema
              JOIN information_schema.constraint_column_usage ccu
                ON tc.constraint_name = ccu.constraint_name
               AND tc.table_schema = ccu.table_schema
              WHERE tc.constraint_type = 'FOREIGN KEY'
                AND tc.table_schema = current_schema()
                AND tc.table_name = $1"
        }
        DatabaseBackend::Mysql => {
            r"SELECT CAST(column_name AS CHAR) AS name,
                     CAST(referenced_table_name AS CHAR) AS ref_table,
                     CAST(referenced_column_name AS CHAR) AS ref_column
              FROM information_schema.key_column_usage
              WHERE table_schema = DATABASE()
                AND table_name = ?
                AND referenced_table_name IS NOT NULL"
        }
    }
}

/// Table count as `n`
const fn table_exists_query(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Sqlite => {
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = ?"
        }
        DatabaseBackend::Postgres => {
            "SELECT COUNT(*) AS n FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1"
        }
        DatabaseBackend::Mysql => {
            "SELECT COUNT(*) AS n FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = ?"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_use_backend_placeholders() {
        for backend in [DatabaseBackend::Sqlite, DatabaseBackend::Mysql] {
            assert!(columns_query(backend).contains('?'));
            assert!(!columns_query(backend).contains("$1"));
        }
        assert!(columns_query(DatabaseBackend::Postgres).contains("$1"));
        assert!(foreign_keys_query(DatabaseBackend::Postgres).contains("$1"));
        assert!(table_exists_query(DatabaseBackend::Postgres).contains("$1"));
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = DatabaseMetadata::connect("oracle://localhost/app").unwrap_err();
        assert!(err.to_string().contains("unsupported database URL scheme"));
    }
}
