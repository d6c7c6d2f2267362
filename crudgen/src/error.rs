//! Error types for scaffold generation

use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::template::RenderError;
use crate::translation::ProvisionError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for scaffold operations
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

/// Fatal scaffold failures
///
/// Missing merge anchors and declined overwrites are not errors; they are
/// reported in the [`ScaffoldReport`](crate::generator::ScaffoldReport).
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The table name was empty
    #[error("table name must not be empty")]
    EmptyTableName,

    /// Column metadata could not be read
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A template could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The translation table could not be provisioned
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// A file could not be read or written
    #[error("failed to write {path}: {source}")]
    Io {
        /// Affected path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
