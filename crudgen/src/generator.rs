//! Scaffold orchestration
//!
//! Runs one scaffold against a project tree:
//!
//! 1. derive names and read the table's columns
//! 2. provision the translation table when fields are translatable
//! 3. render the model, translation model, controller and views
//! 4. write each file the overwrite policy allows
//! 5. merge the route-model binding and the resource route

use crate::config::ScaffoldConfig;
use crate::error::{Result, ScaffoldError};
use crate::merge::{merge_into_file, AnchorPolicy, FileMergeError, MergeOutcome};
use crate::metadata::{infer_foreign_keys, Columns, MetadataSource};
use crate::naming::{derive_names_with, EnglishInflections, NameOverrides, NamingContext};
use crate::overwrite::{decide_for_content, Confirm, WriteDecision};
use crate::template::{TemplateContext, TemplateId, TemplateRenderer};
use crate::translation::{provision, MigrationCollaborator, ProvisionOutcome, TranslationPlan};
use std::path::{Path, PathBuf};

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Path relative to the project root
    pub target_path: PathBuf,
    /// File content
    pub content: String,
    /// Human-readable description
    pub description: String,
    /// Template that produced the content
    pub template: TemplateId,
}

/// Everything a scaffold would produce, computed without touching the tree
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    /// Derived identifiers
    pub names: NamingContext,
    /// Table columns
    pub columns: Columns,
    /// Files to write
    pub artifacts: Vec<GeneratedArtifact>,
    /// Translation table to provision, if translatable
    pub translation: Option<TranslationPlan>,
    /// Line for the route table
    pub route_declaration: String,
    /// Line for the route-model binding provider
    pub binding_declaration: String,
}

/// What happened to one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Human-readable description
    pub description: String,
    /// Overwrite decision
    pub decision: WriteDecision,
}

/// Result of merging a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStatus {
    /// The file was merged
    Merged(MergeOutcome),
    /// The target file does not exist; the declaration must be added by hand
    MissingFile,
}

/// What happened to one merge target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Path relative to the project root
    pub path: PathBuf,
    /// The declaration
    pub declaration: String,
    /// Outcome
    pub status: MergeStatus,
}

impl MergeReport {
    /// Whether the user should check or finish this merge by hand
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(
            self.status,
            MergeStatus::MissingFile | MergeStatus::Merged(MergeOutcome::Appended)
        )
    }
}

/// Summary of a scaffold run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// Derived identifiers
    pub names: NamingContext,
    /// Translation provisioning, if translatable
    pub translation: Option<ProvisionOutcome>,
    /// Per-file outcomes
    pub files: Vec<FileReport>,
    /// Binding and route merges, in that order
    pub merges: Vec<MergeReport>,
}

impl ScaffoldReport {
    /// Files that were written
    pub fn written(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.decision.should_write())
    }
}

/// Collaborators used by [`ScaffoldGenerator::run`]
pub struct Collaborators<'a> {
    /// Column metadata
    pub metadata: &'a dyn MetadataSource,
    /// Overwrite and translation confirmations
    pub confirm: &'a mut dyn Confirm,
    /// Translation migrations
    pub migrations: &'a mut dyn MigrationCollaborator,
}

/// Scaffold generator for one project tree
#[derive(Debug)]
pub struct ScaffoldGenerator {
    project_root: PathBuf,
    config: ScaffoldConfig,
    renderer: TemplateRenderer,
    rules: EnglishInflections,
}

impl ScaffoldGenerator {
    /// Create a generator for `project_root`
    ///
    /// # Errors
    ///
    /// Returns an error if template overrides cannot be loaded.
    pub fn new(project_root: impl Into<PathBuf>, config: ScaffoldConfig) -> Result<Self> {
        let project_root = project_root.into();
        let override_dir = config.templates.dir.as_ref().map(|d| project_root.join(d));
        let renderer = TemplateRenderer::with_overrides(override_dir.as_deref())?;
        let rules = config.inflections();
        Ok(Self {
            project_root,
            config,
            renderer,
            rules,
        })
    }

    /// Derive names, filling unset overrides from configuration
    #[must_use]
    pub fn names(&self, table: &str, overrides: &NameOverrides) -> NamingContext {
        let mut overrides = overrides.clone();
        if overrides
            .translation_suffix
            .as_deref()
            .is_none_or(|s| s.trim().is_empty())
        {
            overrides.translation_suffix = Some(self.config.translation.suffix.clone());
        }
        derive_names_with(table, &overrides, &self.rules)
    }

    /// Render everything for `table` without writing
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is empty, the table cannot be read,
    /// or a template fails.
    pub fn plan(
        &self,
        table: &str,
        overrides: &NameOverrides,
        metadata: &dyn MetadataSource,
    ) -> Result<ScaffoldPlan> {
        let table = table.trim();
        if table.is_empty() {
            return Err(ScaffoldError::EmptyTableName);
        }

        let names = self.names(table, overrides);
        let mut columns = metadata.fields(table)?;
        if self.config.metadata.infer_foreign_keys {
            columns = infer_foreign_keys(columns, &self.rules);
        }
        tracing::debug!(table, columns = columns.len(), "read table metadata");

        let context =
            TemplateContext::build(&names, &columns, &self.config.context_options(), &self.rules);
        let translation = TranslationPlan::new(&names, &columns);
        let artifacts = self.render_artifacts(&names, &context, translation.as_ref())?;

        Ok(ScaffoldPlan {
            route_declaration: names.route_declaration(),
            binding_declaration: names.binding_declaration(),
            names,
            columns,
            artifacts,
            translation,
        })
    }

    fn render_artifacts(
        &self,
        names: &NamingContext,
        context: &TemplateContext,
        translation: Option<&TranslationPlan>,
    ) -> Result<Vec<GeneratedArtifact>> {
        let paths = &self.config.paths;
        let model_dir = names
            .model_subdirectory
            .as_ref()
            .map_or_else(|| paths.models.clone(), |dir| paths.models.join(dir));
        let controller_dir = names
            .base_route
            .as_ref()
            .map_or_else(|| paths.controllers.clone(), |base| paths.controllers.join(base));
        let views_dir = paths.views.join(&names.views_relative_dir);

        let mut artifacts = vec![GeneratedArtifact {
            target_path: model_dir.join(format!("{}.php", names.model_class_name)),
            content: self.renderer.render(TemplateId::Model, context)?,
            description: format!("{} model", names.model_class_name),
            template: TemplateId::Model,
        }];

        if let Some(plan) = translation {
            artifacts.push(GeneratedArtifact {
                target_path: model_dir.join(format!("{}.php", plan.class_name)),
                content: self.renderer.render(TemplateId::TranslationModel, context)?,
                description: format!("{} translation model", plan.class_name),
                template: TemplateId::TranslationModel,
            });
        }

        artifacts.push(GeneratedArtifact {
            target_path: controller_dir.join(format!("{}.php", names.controller_class_name)),
            content: self.renderer.render(TemplateId::Controller, context)?,
            description: format!("{} resource controller", names.controller_class_name),
            template: TemplateId::Controller,
        });

        for view in self.config.views()? {
            let id = TemplateId::View(view);
            artifacts.push(GeneratedArtifact {
                target_path: views_dir.join(format!("{}.blade.php", view.as_str())),
                content: self.renderer.render(id, context)?,
                description: format!("{} view", view.as_str()),
                template: id,
            });
        }

        Ok(artifacts)
    }

    /// Generate the scaffold for `table` into the project tree
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails, the translation table cannot be
    /// provisioned, or a file cannot be written. A missing merge target is
    /// not an error; it is reported as [`MergeStatus::MissingFile`].
    pub fn run(
        &self,
        table: &str,
        overrides: &NameOverrides,
        collaborators: Collaborators<'_>,
    ) -> Result<ScaffoldReport> {
        let Collaborators {
            metadata,
            confirm,
            migrations,
        } = collaborators;

        let plan = self.plan(table, overrides, metadata)?;

        let translation = match &plan.translation {
            Some(translation) => Some(provision(translation, metadata, migrations, confirm)?),
            None => None,
        };

        let mut files = Vec::with_capacity(plan.artifacts.len());
        for artifact in &plan.artifacts {
            files.push(self.write_artifact(artifact, confirm)?);
        }

        let merges = vec![
            self.merge(
                &self.config.paths.binding_file,
                &plan.binding_declaration,
                &AnchorPolicy::route_bindings(),
            )?,
            self.merge(
                &self.config.paths.routes_file,
                &plan.route_declaration,
                &AnchorPolicy::route_table(&self.config.routes.marker),
            )?,
        ];

        tracing::info!(
            table = %plan.names.table_name,
            written = files.iter().filter(|f| f.decision.should_write()).count(),
            "scaffold generated"
        );

        Ok(ScaffoldReport {
            names: plan.names,
            translation,
            files,
            merges,
        })
    }

    fn write_artifact(
        &self,
        artifact: &GeneratedArtifact,
        confirm: &mut dyn Confirm,
    ) -> Result<FileReport> {
        let path = self.project_root.join(&artifact.target_path);
        let decision = decide_for_content(&path, &artifact.content, confirm);

        if decision.should_write() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(ScaffoldError::io(parent))?;
            }
            std::fs::write(&path, &artifact.content).map_err(ScaffoldError::io(&path))?;
            tracing::debug!(path = %path.display(), ?decision, "wrote file");
        } else {
            tracing::info!(path = %path.display(), "kept existing file");
        }

        Ok(FileReport {
            path: artifact.target_path.clone(),
            description: artifact.description.clone(),
            decision,
        })
    }

    fn merge(&self, relative: &Path, declaration: &str, policy: &AnchorPolicy) -> Result<MergeReport> {
        let path = self.project_root.join(relative);
        let status = match merge_into_file(&path, declaration, policy) {
            Ok(merged) => MergeStatus::Merged(merged.outcome),
            Err(FileMergeError::Missing { .. }) => {
                tracing::warn!(
                    path = %path.display(),
                    declaration,
                    "merge target does not exist; add the declaration manually"
                );
                MergeStatus::MissingFile
            }
            Err(FileMergeError::Io { path, source }) => {
                return Err(ScaffoldError::Io { path, source });
            }
        };

        Ok(MergeReport {
            path: relative.to_path_buf(),
            declaration: declaration.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ColumnDescriptor, StaticMetadata};
    use crate::overwrite::{AutoConfirm, ScriptedConfirm};
    use crate::translation::RecordingMigrations;

    fn metadata() -> StaticMetadata {
        StaticMetadata::new()
            .with_table(
                "blog_posts",
                [
                    ColumnDescriptor::new("id", "integer").primary_key(),
                    ColumnDescriptor::new("title", "varchar(255)"),
                    ColumnDescriptor::new("body", "text"),
                ],
            )
            .with_table(
                "posts",
                [
                    ColumnDescriptor::new("id", "integer").primary_key(),
                    ColumnDescriptor::new("title", "varchar(255)"),
                    ColumnDescriptor::new("body", "text"),
                ],
            )
    }

    fn generator(root: &Path) -> ScaffoldGenerator {
        ScaffoldGenerator::new(root, ScaffoldConfig::default()).unwrap()
    }

    #[test]
    fn test_plan_paths() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = NameOverrides::default()
            .with_base_route("Admin")
            .with_model_subdirectory("Models");
        let plan = generator(dir.path())
            .plan("blog_posts", &overrides, &metadata())
            .unwrap();

        let paths: Vec<_> = plan.artifacts.iter().map(|a| a.target_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("app/Models/BlogPost.php"),
                PathBuf::from("app/Http/Controllers/Admin/BlogPostController.php"),
                PathBuf::from("resources/views/admin/blog_post/index.blade.php"),
                PathBuf::from("resources/views/admin/blog_post/create.blade.php"),
                PathBuf::from("resources/views/admin/blog_post/edit.blade.php"),
                PathBuf::from("resources/views/admin/blog_post/show.blade.php"),
            ]
        );
        assert_eq!(
            plan.route_declaration,
            "Route::resource('admin/blog-post', 'Admin\\BlogPostController');"
        );
        assert_eq!(
            plan.binding_declaration,
            "$router->model('blog_post', 'App\\Models\\BlogPost');"
        );
    }

    #[test]
    fn test_empty_table_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = generator(dir.path())
            .plan("  ", &NameOverrides::default(), &metadata())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::EmptyTableName));
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = generator(dir.path())
            .plan("comments", &NameOverrides::default(), &metadata())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Metadata(_)));
    }

    #[test]
    fn test_run_without_merge_targets() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(dir.path())
            .run(
                "blog_posts",
                &NameOverrides::default(),
                Collaborators {
                    metadata: &metadata(),
                    confirm: &mut ScriptedConfirm::new([]),
                    migrations: &mut RecordingMigrations::default(),
                },
            )
            .unwrap();

        assert_eq!(report.written().count(), 6);
        assert!(dir.path().join("app/BlogPost.php").is_file());
        assert!(report.merges.iter().all(MergeReport::needs_attention));
        assert_eq!(report.merges[0].status, MergeStatus::MissingFile);
    }

    #[test]
    fn test_run_translatable_with_suffix_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ScaffoldConfig::default();
        config.translation.suffix = "_locales".to_string();
        config.generate.views = vec!["index".to_string()];
        let generator = ScaffoldGenerator::new(dir.path(), config).unwrap();

        let mut migrations = RecordingMigrations::default();
        let report = generator
            .run(
                "posts",
                &NameOverrides::default().with_translatable_fields(["title"]),
                Collaborators {
                    metadata: &metadata(),
                    confirm: &mut AutoConfirm(false),
                    migrations: &mut migrations,
                },
            )
            .unwrap();

        assert_eq!(report.translation, Some(ProvisionOutcome::CreatedAndRun));
        assert_eq!(
            migrations.created,
            vec![(
                "post_locales".to_string(),
                vec![
                    "post_id#int".to_string(),
                    "locale#string".to_string(),
                    "title#string".to_string()
                ]
            )]
        );
        assert!(dir.path().join("app/PostLocale.php").is_file());
        assert_eq!(report.files.len(), 4);
    }
}
