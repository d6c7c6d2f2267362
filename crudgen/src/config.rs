//! Layered scaffold configuration
//!
//! Configuration is loaded from three sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `crud.toml` in the project root (or an explicit file)
//! 3. Environment variables with the `CRUDGEN_` prefix, `__` separating
//!    sections, e.g. `CRUDGEN_PATHS__ROUTES_FILE=routes/web.php`
//!
//! # Example Configuration
//!
//! ```toml
//! # crud.toml
//! [paths]
//! models = "app/Models"
//! routes_file = "routes/web.php"
//!
//! [presentation]
//! layout = "layouts.admin"
//! display_field = "title"
//!
//! [routes]
//! marker = "crud routes go here"
//!
//! [inflections]
//! uncountable = ["equipment"]
//!
//! [inflections.irregular]
//! cactus = "cacti"
//! ```

use crate::naming::EnglishInflections;
use crate::template::{ContextOptions, RenderError, ViewKind};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "crud.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CRUDGEN_";

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or extracted
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// Defaults could not be serialized
    #[error("failed to serialize default configuration: {0}")]
    Defaults(#[from] toml::ser::Error),
}

/// Locations of generated and patched files, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Model root directory
    pub models: PathBuf,
    /// Controller root directory
    pub controllers: PathBuf,
    /// View root directory
    pub views: PathBuf,
    /// Route table receiving the resource route
    pub routes_file: PathBuf,
    /// Provider receiving the route-model binding
    pub binding_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            models: PathBuf::from("app"),
            controllers: PathBuf::from("app/Http/Controllers"),
            views: PathBuf::from("resources/views"),
            routes_file: PathBuf::from("app/Http/routes.php"),
            binding_file: PathBuf::from("app/Providers/RouteServiceProvider.php"),
        }
    }
}

/// Which artifacts to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSettings {
    /// Views to render, by name
    pub views: Vec<String>,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            views: ViewKind::ALL.iter().map(|v| v.as_str().to_string()).collect(),
        }
    }
}

/// Template sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory with template overrides, relative to the project root
    pub dir: Option<PathBuf>,
}

/// View presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    /// Blade layout the views extend
    pub layout: String,
    /// Column of related models shown in selects
    pub display_field: String,
    /// Index page size
    pub per_page: u32,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        let defaults = ContextOptions::default();
        Self {
            layout: defaults.layout,
            display_field: defaults.display_field,
            per_page: defaults.per_page,
        }
    }
}

/// Route table merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Placeholder comment below which routes are inserted
    pub marker: String,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            marker: "crud routes go here".to_string(),
        }
    }
}

/// Translation tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Default translation table suffix
    pub suffix: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            suffix: crate::naming::DEFAULT_TRANSLATION_SUFFIX.to_string(),
        }
    }
}

/// Metadata sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Database to introspect
    pub database_url: Option<String>,
    /// TOML schema file used instead of a database
    pub schema: Option<PathBuf>,
    /// Treat integer `<x>_id` columns as foreign keys
    pub infer_foreign_keys: bool,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            schema: None,
            infer_foreign_keys: true,
        }
    }
}

/// Migration command of the target application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    /// Program and leading arguments, e.g. `["php", "artisan"]`
    pub command: Vec<String>,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            command: vec!["php".to_string(), "artisan".to_string()],
        }
    }
}

/// Extra pluralization rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflectionSettings {
    /// singular → plural
    pub irregular: BTreeMap<String, String>,
    /// Words with no distinct plural
    pub uncountable: Vec<String>,
}

/// Complete scaffold configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// File locations
    pub paths: PathSettings,
    /// Artifact selection
    pub generate: GenerateSettings,
    /// Template overrides
    pub templates: TemplateSettings,
    /// View presentation
    pub presentation: PresentationSettings,
    /// Route merging
    pub routes: RouteSettings,
    /// Translation tables
    pub translation: TranslationSettings,
    /// Metadata sources
    pub metadata: MetadataSettings,
    /// Migration command
    pub migrations: MigrationSettings,
    /// Pluralization rules
    pub inflections: InflectionSettings,
}

impl ScaffoldConfig {
    /// Load configuration for a project
    ///
    /// Reads `explicit` if given, otherwise `crud.toml` in `project_root` when
    /// present. Environment variables override both.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = explicit.map_or_else(|| project_root.join(CONFIG_FILE_NAME), Path::to_path_buf);
        Self::figment(&file)?
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn figment(file: &Path) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        if file.exists() {
            tracing::debug!(path = %file.display(), "loading configuration file");
            figment = figment.merge(Toml::file(file));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true)))
    }

    /// Pluralization ruleset including configured irregulars
    #[must_use]
    pub fn inflections(&self) -> EnglishInflections {
        let rules = self
            .inflections
            .irregular
            .iter()
            .fold(EnglishInflections::default(), |rules, (singular, plural)| {
                rules.with_irregular(singular, plural)
            });
        self.inflections
            .uncountable
            .iter()
            .fold(rules, |rules, word| rules.with_uncountable(word))
    }

    /// Template context presentation options
    #[must_use]
    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            layout: self.presentation.layout.clone(),
            display_field: self.presentation.display_field.clone(),
            per_page: self.presentation.per_page,
        }
    }

    /// Views to generate
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTemplate`] for a view outside the catalog.
    pub fn views(&self) -> Result<Vec<ViewKind>, RenderError> {
        self.generate.views.iter().map(|v| v.parse()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::Inflections;

    #[test]
    fn test_defaults() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.paths.models, PathBuf::from("app"));
        assert_eq!(config.paths.routes_file, PathBuf::from("app/Http/routes.php"));
        assert_eq!(config.routes.marker, "crud routes go here");
        assert_eq!(config.translation.suffix, "_translations");
        assert_eq!(config.presentation.per_page, 15);
        assert!(config.metadata.infer_foreign_keys);
        assert_eq!(config.migrations.command, vec!["php", "artisan"]);
        assert_eq!(config.views().unwrap(), ViewKind::ALL.to_vec());
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScaffoldConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.paths, PathSettings::default());
        assert_eq!(config.presentation, PresentationSettings::default());
    }

    #[test]
    fn test_load_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[paths]
routes_file = "routes/web.php"

[generate]
views = ["index", "show"]

[presentation]
layout = "layouts.admin"

[inflections.irregular]
cactus = "cacti"
"#,
        )
        .unwrap();

        let config = ScaffoldConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.paths.routes_file, PathBuf::from("routes/web.php"));
        assert_eq!(config.paths.models, PathBuf::from("app"));
        assert_eq!(config.presentation.layout, "layouts.admin");
        assert_eq!(config.presentation.display_field, "name");
        assert_eq!(config.views().unwrap(), vec![ViewKind::Index, ViewKind::Show]);
        assert_eq!(config.inflections().plural("cactus"), "cacti");
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.toml");
        std::fs::write(&path, "[routes]\nmarker = \"routes here\"\n").unwrap();

        let config = ScaffoldConfig::load(dir.path(), Some(&path)).unwrap();
        assert_eq!(config.routes.marker, "routes here");
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        let mut config = ScaffoldConfig::default();
        config.generate.views = vec!["list".to_string()];
        assert!(matches!(config.views(), Err(RenderError::UnknownTemplate(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[presentation]\nper_page = \"many\"\n")
            .unwrap();
        assert!(ScaffoldConfig::load(dir.path(), None).is_err());
    }
}
