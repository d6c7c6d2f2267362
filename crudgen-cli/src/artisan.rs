//! Migrations through the application's own console

use crudgen::translation::{MigrationCollaborator, MigrationError};
use std::path::PathBuf;
use std::process::Command;

/// Runs `crud:migration` and `migrate` through the project's console command
///
/// The console command defaults to `php artisan`, run from the project root.
#[derive(Debug, Clone)]
pub struct ArtisanMigrations {
    project_root: PathBuf,
    command: Vec<String>,
}

impl ArtisanMigrations {
    /// Console command `command` run from `project_root`
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>, command: Vec<String>) -> Self {
        Self {
            project_root: project_root.into(),
            command,
        }
    }

    /// Full argument list for creating a migration
    #[must_use]
    pub fn create_migration_args(&self, table: &str, schema_fields: &[String]) -> Vec<String> {
        let mut args = self.command.clone();
        args.push("crud:migration".to_string());
        args.push(table.to_string());
        args.push(format!("--schema={}", schema_fields.join(",")));
        args
    }

    /// Full argument list for running pending migrations
    #[must_use]
    pub fn migrate_args(&self) -> Vec<String> {
        let mut args = self.command.clone();
        args.push("migrate".to_string());
        args
    }

    fn execute(&self, args: &[String]) -> Result<(), MigrationError> {
        let command_line = args.join(" ");
        let (program, rest) = args.split_first().ok_or_else(|| MigrationError::Spawn {
            command: command_line.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty migration command"),
        })?;

        tracing::info!(command = %command_line, "running migration command");

        let output = Command::new(program)
            .args(rest)
            .current_dir(&self.project_root)
            .output()
            .map_err(|source| MigrationError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if output.status.success() {
            tracing::debug!(
                stdout = %String::from_utf8_lossy(&output.stdout).trim(),
                "migration command finished"
            );
            Ok(())
        } else {
            Err(MigrationError::Failed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl MigrationCollaborator for ArtisanMigrations {
    fn create_migration(
        &mut self,
        table: &str,
        schema_fields: &[String],
    ) -> Result<(), MigrationError> {
        let args = self.create_migration_args(table, schema_fields);
        self.execute(&args)
    }

    fn run_pending(&mut self) -> Result<(), MigrationError> {
        let args = self.migrate_args();
        self.execute(&args)
    }
}
