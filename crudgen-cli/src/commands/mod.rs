//! CLI command implementations

pub mod scaffold;
pub mod templates;

pub use scaffold::ScaffoldCommand;
pub use templates::TemplatesCommand;

use anyhow::{Context, Result};
use crudgen::config::ScaffoldConfig;
use std::path::{Path, PathBuf};

/// Project root from `--project-root`, or the current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(root) => Ok(root.to_path_buf()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Configuration for `project_root`, honouring `--config`
///
/// # Errors
///
/// Returns an error if a configuration source is malformed.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<ScaffoldConfig> {
    ScaffoldConfig::load(project_root, explicit).context("Failed to load configuration")
}
