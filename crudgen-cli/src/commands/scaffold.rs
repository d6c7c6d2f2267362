//! `crudgen scaffold <table>`
//!
//! Reads the table's columns and writes the model, controller and views,
//! then registers the route and the route-model binding.
//!
//! # Example
//!
//! ```bash
//! crudgen scaffold blog_posts \
//!   --route-base Admin \
//!   --translatable-fields "[title,body]" \
//!   --database-url sqlite://database/database.sqlite
//! ```

use crate::artisan::ArtisanMigrations;
use crate::database::DatabaseMetadata;
use crate::prompt::TerminalConfirm;
use anyhow::{bail, Context, Result};
use console::style;
use crudgen::config::ScaffoldConfig;
use crudgen::generator::{Collaborators, MergeReport, MergeStatus, ScaffoldGenerator, ScaffoldReport};
use crudgen::merge::MergeOutcome;
use crudgen::metadata::{MetadataSource, SchemaFile};
use crudgen::naming::NameOverrides;
use crudgen::overwrite::{AutoConfirm, Confirm, WriteDecision};
use crudgen::translation::{parse_translatable_fields, ProvisionOutcome};
use std::path::{Path, PathBuf};

/// Where column metadata comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataChoice {
    /// TOML schema file
    Schema(PathBuf),
    /// Live database
    Database(String),
}

impl MetadataChoice {
    /// Pick a source: flags first, then configuration
    ///
    /// A schema wins over a database URL at the same level. Relative schema
    /// paths are resolved against `project_root`.
    #[must_use]
    pub fn resolve(
        schema: Option<&Path>,
        database_url: Option<&str>,
        config: &ScaffoldConfig,
        project_root: &Path,
    ) -> Option<Self> {
        let (schema, database_url) = if schema.is_some() || database_url.is_some() {
            (schema, database_url)
        } else {
            (
                config.metadata.schema.as_deref(),
                config.metadata.database_url.as_deref(),
            )
        };

        match (schema, database_url) {
            (Some(path), _) => Some(Self::Schema(project_root.join(path))),
            (None, Some(url)) => Some(Self::Database(url.to_string())),
            (None, None) => None,
        }
    }

    fn open(&self) -> Result<Box<dyn MetadataSource>> {
        match self {
            Self::Schema(path) => {
                let schema = SchemaFile::load(path)
                    .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
                Ok(Box::new(schema.into_metadata()))
            }
            Self::Database(url) => Ok(Box::new(DatabaseMetadata::connect(url)?)),
        }
    }
}

/// Scaffold options from the command line
#[derive(Debug, Clone, Default)]
pub struct ScaffoldCommand {
    /// Table to scaffold
    pub table: String,
    /// Route prefix and controller sub-namespace
    pub route_base: Option<String>,
    /// Model subdirectory
    pub model_dir: Option<String>,
    /// Raw translatable field list
    pub translatable_fields: Option<String>,
    /// Translation table suffix
    pub translate_suffix: Option<String>,
    /// Schema file
    pub schema: Option<PathBuf>,
    /// Database URL
    pub database_url: Option<String>,
    /// Overwrite existing files without asking
    pub force: bool,
    /// Never prompt; keep existing files
    pub no_interaction: bool,
}

impl ScaffoldCommand {
    /// Name overrides from the flags
    #[must_use]
    pub fn overrides(&self) -> NameOverrides {
        let mut overrides = NameOverrides::default();
        if let Some(base) = non_blank(self.route_base.as_deref()) {
            overrides = overrides.with_base_route(base);
        }
        if let Some(dir) = non_blank(self.model_dir.as_deref()) {
            overrides = overrides.with_model_subdirectory(dir);
        }
        if let Some(suffix) = non_blank(self.translate_suffix.as_deref()) {
            overrides = overrides.with_translation_suffix(suffix);
        }
        if let Some(raw) = self.translatable_fields.as_deref() {
            overrides = overrides.with_translatable_fields(parse_translatable_fields(raw));
        }
        overrides
    }

    fn confirm(&self) -> Box<dyn Confirm> {
        if self.force {
            Box::new(AutoConfirm(true))
        } else if self.no_interaction {
            Box::new(AutoConfirm(false))
        } else {
            Box::new(TerminalConfirm::new())
        }
    }

    /// Run the scaffold in `project_root`
    ///
    /// # Errors
    ///
    /// Returns an error if no metadata source is configured, the table
    /// cannot be read, or generation fails.
    pub fn execute(&self, project_root: &Path, config: ScaffoldConfig) -> Result<()> {
        println!(
            "\n{} {} {}",
            style("Scaffolding CRUD for").cyan().bold(),
            style(&self.table).green().bold(),
            style("...").cyan().bold()
        );

        let Some(choice) = MetadataChoice::resolve(
            self.schema.as_deref(),
            self.database_url.as_deref(),
            &config,
            project_root,
        ) else {
            bail!(
                "No metadata source: pass --schema or --database-url, or set [metadata] in crud.toml"
            );
        };
        tracing::debug!(?choice, "metadata source");
        let metadata = choice.open()?;

        let mut migrations =
            ArtisanMigrations::new(project_root, config.migrations.command.clone());
        let mut confirm = self.confirm();

        let generator = ScaffoldGenerator::new(project_root, config)
            .context("Failed to create scaffold generator")?;

        let report = generator
            .run(
                &self.table,
                &self.overrides(),
                Collaborators {
                    metadata: metadata.as_ref(),
                    confirm: confirm.as_mut(),
                    migrations: &mut migrations,
                },
            )
            .with_context(|| format!("Failed to scaffold `{}`", self.table))?;

        print_report(&report);
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn print_report(report: &ScaffoldReport) {
    if let (Some(outcome), Some(table)) = (report.translation, &report.names.translation_table_name) {
        match outcome {
            ProvisionOutcome::CreatedAndRun => println!(
                "\n  {} translation table {} migrated",
                style("✓").green(),
                style(table).bold()
            ),
            ProvisionOutcome::CreatedNotRun => println!(
                "\n  {} migration for existing table {} created; review it and run {}",
                style("!").yellow(),
                style(table).bold(),
                style("php artisan migrate").yellow()
            ),
            ProvisionOutcome::Skipped => println!(
                "\n  {} translation table {} left unchanged",
                style("-").dim(),
                style(table).dim()
            ),
        }
    }

    println!(
        "\n{} {} of {} files:",
        style("Generated").green().bold(),
        report.written().count(),
        report.files.len()
    );
    for file in &report.files {
        let (mark, verb) = match file.decision {
            WriteDecision::Create => (style("✓").green(), "created"),
            WriteDecision::Overwrite => (style("✓").yellow(), "overwritten"),
            WriteDecision::Keep => (style("-").dim(), "kept"),
        };
        println!(
            "  {} {} ({}, {})",
            mark,
            style(file.path.display()).dim(),
            style(&file.description).dim(),
            verb
        );
    }

    println!("\n{}", style("Registrations:").cyan().bold());
    for merge in &report.merges {
        print_merge(merge);
    }

    if report.merges.iter().any(MergeReport::needs_attention) {
        println!(
            "\n{} some declarations need manual attention",
            style("Note:").yellow().bold()
        );
    } else {
        println!(
            "\n{} CRUD scaffold for {} is ready!",
            style("✨").green().bold(),
            style(&report.names.table_name).green().bold()
        );
    }
}

fn print_merge(merge: &MergeReport) {
    let path = merge.path.display();
    match &merge.status {
        MergeStatus::Merged(MergeOutcome::AlreadyPresent) => println!(
            "  {} {} already declared in {}",
            style("-").dim(),
            style(&merge.declaration).dim(),
            style(path).dim()
        ),
        MergeStatus::Merged(MergeOutcome::InsertedAfterAnchor { anchor }) => println!(
            "  {} {} ({} after {})",
            style("✓").green(),
            style(path).dim(),
            style(&merge.declaration).dim(),
            anchor
        ),
        MergeStatus::Merged(MergeOutcome::Appended) => println!(
            "  {} no anchor found in {}; appended {} at the end, move it into place",
            style("!").yellow(),
            style(path).yellow(),
            style(&merge.declaration).yellow()
        ),
        MergeStatus::MissingFile => println!(
            "  {} {} not found; add manually: {}",
            style("✗").red(),
            style(path).red(),
            style(&merge.declaration).yellow()
        ),
    }
}
