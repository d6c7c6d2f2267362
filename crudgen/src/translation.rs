//! Translation table planning and provisioning
//!
//! A translatable resource keeps its per-locale columns in a companion table
//! (`post_translations` for `posts`). The plan lists the migration fields in
//! `name#type` form; creating and running the migration is delegated to a
//! [`MigrationCollaborator`].

use crate::metadata::{Columns, MetadataError, MetadataSource};
use crate::naming::NamingContext;
use crate::overwrite::Confirm;
use thiserror::Error;

/// Migration collaborator failures
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The migration command could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The migration command exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        /// Command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },
}

/// Creates and runs schema migrations in the target application
pub trait MigrationCollaborator {
    /// Create a migration for `table` with `name#type` field specs
    ///
    /// # Errors
    ///
    /// Returns an error if the migration cannot be created.
    fn create_migration(&mut self, table: &str, schema_fields: &[String])
        -> Result<(), MigrationError>;

    /// Apply all pending migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the migrations fail.
    fn run_pending(&mut self) -> Result<(), MigrationError>;
}

/// Records calls instead of running anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingMigrations {
    /// `(table, fields)` per created migration
    pub created: Vec<(String, Vec<String>)>,
    /// Number of `run_pending` calls
    pub runs: usize,
}

impl MigrationCollaborator for RecordingMigrations {
    fn create_migration(
        &mut self,
        table: &str,
        schema_fields: &[String],
    ) -> Result<(), MigrationError> {
        self.created.push((table.to_string(), schema_fields.to_vec()));
        Ok(())
    }

    fn run_pending(&mut self) -> Result<(), MigrationError> {
        self.runs += 1;
        Ok(())
    }
}

/// Everything needed to create a translation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPlan {
    /// Translation table name
    pub table_name: String,
    /// Translation model class name
    pub class_name: String,
    /// Migration field specs, `name#type`
    pub migration_fields: Vec<String>,
}

impl TranslationPlan {
    /// Plan the translation table, or `None` if the table is not translatable
    ///
    /// Fields are listed as `<singular>_id#int`, `locale#string`, then the
    /// translatable columns in table order. Translatable fields that are not
    /// columns of the table are skipped with a warning.
    #[must_use]
    pub fn new(names: &NamingContext, columns: &Columns) -> Option<Self> {
        let table_name = names.translation_table_name.clone()?;
        let class_name = names.translation_class_name.clone()?;

        for field in &names.translatable_fields {
            if !columns.contains(field) {
                tracing::warn!(
                    table = %names.table_name,
                    %field,
                    "translatable field is not a column of the table; skipping"
                );
            }
        }

        let mut migration_fields = vec![
            format!("{}_id#int", names.views_directory_name.to_lowercase()),
            "locale#string".to_string(),
        ];
        migration_fields.extend(
            columns
                .iter()
                .filter(|c| names.translatable_fields.contains(&c.name))
                .map(|c| format!("{}#{}", c.name, c.kind.tag())),
        );

        Some(Self {
            table_name,
            class_name,
            migration_fields,
        })
    }
}

/// What provisioning did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Migration created and applied
    CreatedAndRun,
    /// Table already existed; migration created but left pending
    CreatedNotRun,
    /// Table already existed and the user declined a new migration
    Skipped,
}

/// Translation provisioning failures
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Existence check failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Migration collaborator failed
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Create the translation table migration
///
/// If the table is absent the migration is created and run. If it already
/// exists the user is asked first; a confirmed migration is created but not
/// run so it can be reviewed.
///
/// # Errors
///
/// Returns an error if the existence check or a migration step fails.
pub fn provision(
    plan: &TranslationPlan,
    metadata: &dyn MetadataSource,
    migrations: &mut dyn MigrationCollaborator,
    confirm: &mut dyn Confirm,
) -> Result<ProvisionOutcome, ProvisionError> {
    if metadata.table_exists(&plan.table_name)? {
        let prompt = format!(
            "Translation table '{}' already exists. Create a new migration anyway? It will not be run.",
            plan.table_name
        );
        if !confirm.confirm(&prompt) {
            tracing::info!(table = %plan.table_name, "translation table exists; skipping migration");
            return Ok(ProvisionOutcome::Skipped);
        }
        migrations.create_migration(&plan.table_name, &plan.migration_fields)?;
        return Ok(ProvisionOutcome::CreatedNotRun);
    }

    migrations.create_migration(&plan.table_name, &plan.migration_fields)?;
    migrations.run_pending()?;
    tracing::info!(table = %plan.table_name, "translation table migrated");
    Ok(ProvisionOutcome::CreatedAndRun)
}

/// Parse a translatable field list
///
/// Accepts `title,body`, `[title,body]`, `['title','body']` and JSON
/// `["title","body"]`.
///
/// ```
/// use crudgen::translation::parse_translatable_fields;
///
/// assert_eq!(parse_translatable_fields("[title, body]"), vec!["title", "body"]);
/// assert_eq!(parse_translatable_fields(r#"["title","body"]"#), vec!["title", "body"]);
/// ```
#[must_use]
pub fn parse_translatable_fields(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        if let Ok(fields) = serde_json::from_str::<Vec<String>>(raw) {
            return clean(fields.into_iter());
        }
    }
    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(raw);
    clean(inner.split(',').map(ToString::to_string))
}

fn clean(fields: impl Iterator<Item = String>) -> Vec<String> {
    fields
        .map(|f| f.trim().trim_matches(|c: char| c == '\'' || c == '"').trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ColumnDescriptor, StaticMetadata};
    use crate::naming::{derive_names, NameOverrides};
    use crate::overwrite::ScriptedConfirm;

    fn posts_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "integer").primary_key(),
            ColumnDescriptor::new("body", "text"),
            ColumnDescriptor::new("title", "varchar(255)"),
            ColumnDescriptor::new("published", "boolean"),
        ]
    }

    fn plan() -> TranslationPlan {
        let names = derive_names(
            "posts",
            &NameOverrides::default().with_translatable_fields(["title", "body"]),
        );
        let columns = posts_columns().into_iter().collect();
        TranslationPlan::new(&names, &columns).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = vec!["title".to_string(), "body".to_string()];
        assert_eq!(parse_translatable_fields("title,body"), expected);
        assert_eq!(parse_translatable_fields("[title,body]"), expected);
        assert_eq!(parse_translatable_fields("['title', 'body']"), expected);
        assert_eq!(parse_translatable_fields(r#"["title","body"]"#), expected);
        assert!(parse_translatable_fields("").is_empty());
        assert!(parse_translatable_fields("[]").is_empty());
    }

    #[test]
    fn test_plan_fields_follow_table_order() {
        let plan = plan();
        assert_eq!(plan.table_name, "post_translations");
        assert_eq!(plan.class_name, "PostTranslation");
        assert_eq!(
            plan.migration_fields,
            vec!["post_id#int", "locale#string", "body#text", "title#string"]
        );
    }

    #[test]
    fn test_no_plan_without_translatable_fields() {
        let names = derive_names("posts", &NameOverrides::default());
        let columns = posts_columns().into_iter().collect();
        assert!(TranslationPlan::new(&names, &columns).is_none());
    }

    #[test]
    fn test_unknown_translatable_field_is_skipped() {
        let names = derive_names(
            "posts",
            &NameOverrides::default().with_translatable_fields(["title", "summary"]),
        );
        let columns = posts_columns().into_iter().collect();
        let plan = TranslationPlan::new(&names, &columns).unwrap();
        assert_eq!(
            plan.migration_fields,
            vec!["post_id#int", "locale#string", "title#string"]
        );
    }

    #[test]
    fn test_provision_new_table_runs_migration() {
        let metadata = StaticMetadata::new().with_table("posts", posts_columns());
        let mut migrations = RecordingMigrations::default();
        let mut confirm = ScriptedConfirm::new([]);

        let outcome = provision(&plan(), &metadata, &mut migrations, &mut confirm).unwrap();

        assert_eq!(outcome, ProvisionOutcome::CreatedAndRun);
        assert_eq!(migrations.created.len(), 1);
        assert_eq!(migrations.created[0].0, "post_translations");
        assert_eq!(migrations.runs, 1);
        assert!(confirm.prompts().is_empty());
    }

    #[test]
    fn test_provision_existing_table() {
        let metadata = StaticMetadata::new()
            .with_table("posts", posts_columns())
            .with_table("post_translations", []);

        let mut migrations = RecordingMigrations::default();
        let outcome = provision(
            &plan(),
            &metadata,
            &mut migrations,
            &mut ScriptedConfirm::new([true]),
        )
        .unwrap();
        assert_eq!(outcome, ProvisionOutcome::CreatedNotRun);
        assert_eq!(migrations.created.len(), 1);
        assert_eq!(migrations.runs, 0);

        let mut migrations = RecordingMigrations::default();
        let outcome = provision(
            &plan(),
            &metadata,
            &mut migrations,
            &mut ScriptedConfirm::new([false]),
        )
        .unwrap();
        assert_eq!(outcome, ProvisionOutcome::Skipped);
        assert_eq!(migrations, RecordingMigrations::default());
    }
}
