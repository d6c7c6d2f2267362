//! crudgen CLI library

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

pub mod artisan;
pub mod commands;
pub mod database;
pub mod observability;
pub mod prompt;

pub use artisan::ArtisanMigrations;
pub use database::DatabaseMetadata;
pub use prompt::TerminalConfirm;

/// Database backend, chosen from the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DatabaseBackend {
    /// `SQLite` (default)
    #[default]
    Sqlite,
    /// `PostgreSQL`
    Postgres,
    /// `MySQL` or `MariaDB`
    Mysql,
}

impl DatabaseBackend {
    /// Backend for a connection URL, if the scheme is supported
    ///
    /// ```
    /// use crudgen_cli_lib::DatabaseBackend;
    ///
    /// assert_eq!(DatabaseBackend::from_url("sqlite://app.db"), Some(DatabaseBackend::Sqlite));
    /// assert_eq!(DatabaseBackend::from_url("postgresql://localhost/app"), Some(DatabaseBackend::Postgres));
    /// assert_eq!(DatabaseBackend::from_url("mariadb://localhost/app"), Some(DatabaseBackend::Mysql));
    /// assert_eq!(DatabaseBackend::from_url("oracle://localhost"), None);
    /// ```
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme)?;
        match scheme.to_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::Mysql),
            _ => None,
        }
    }
}
