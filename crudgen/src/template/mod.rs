//! Template catalog and rendering
//!
//! Templates are rendered with minijinja using `[[ … ]]`, `[% … %]` and
//! `[# … #]` delimiters so Blade's own `{{ }}` and `@directives` pass through
//! untouched. Default sources are embedded in the binary; an override
//! directory may replace any of them by file name.

mod context;
mod markup;

pub use context::{ContextOptions, FieldContext, RelationContext, RouteNames, TemplateContext};

use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Template rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template id is not in the catalog
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    /// An override template could not be read
    #[error("failed to read template override {path}: {source}")]
    ReadOverride {
        /// Override file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The template failed to compile or render
    #[error("template '{template}' failed: {source}")]
    Template {
        /// Template id
        template: String,
        /// Engine error
        #[source]
        source: minijinja::Error,
    },
}

/// Generated view kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    /// Listing with search and sort
    Index,
    /// Create form
    Create,
    /// Edit form
    Edit,
    /// Single record
    Show,
}

impl ViewKind {
    /// All view kinds in generation order
    pub const ALL: [Self; 4] = [Self::Index, Self::Create, Self::Edit, Self::Show];

    /// View name, e.g. `index`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Show => "show",
        }
    }
}

impl FromStr for ViewKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| RenderError::UnknownTemplate(format!("view:{s}")))
    }
}

/// Template catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    /// Eloquent model
    Model,
    /// Translation model of a translatable resource
    TranslationModel,
    /// Resource controller
    Controller,
    /// Blade view
    View(ViewKind),
}

impl TemplateId {
    /// Every template in the catalog
    pub const ALL: [Self; 7] = [
        Self::Model,
        Self::TranslationModel,
        Self::Controller,
        Self::View(ViewKind::Index),
        Self::View(ViewKind::Create),
        Self::View(ViewKind::Edit),
        Self::View(ViewKind::Show),
    ];

    /// Catalog id, e.g. `model:translation` or `view:index`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::TranslationModel => "model:translation",
            Self::Controller => "controller",
            Self::View(ViewKind::Index) => "view:index",
            Self::View(ViewKind::Create) => "view:create",
            Self::View(ViewKind::Edit) => "view:edit",
            Self::View(ViewKind::Show) => "view:show",
        }
    }

    /// File name of the template, relative to a template directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Model => "model.php.j2",
            Self::TranslationModel => "translation_model.php.j2",
            Self::Controller => "controller.php.j2",
            Self::View(ViewKind::Index) => "views/index.blade.php.j2",
            Self::View(ViewKind::Create) => "views/create.blade.php.j2",
            Self::View(ViewKind::Edit) => "views/edit.blade.php.j2",
            Self::View(ViewKind::Show) => "views/show.blade.php.j2",
        }
    }

    /// Embedded default source
    #[must_use]
    pub const fn embedded_source(self) -> &'static str {
        match self {
            Self::Model => include_str!("../../templates/model.php.j2"),
            Self::TranslationModel => include_str!("../../templates/translation_model.php.j2"),
            Self::Controller => include_str!("../../templates/controller.php.j2"),
            Self::View(ViewKind::Index) => include_str!("../../templates/views/index.blade.php.j2"),
            Self::View(ViewKind::Create) => include_str!("../../templates/views/create.blade.php.j2"),
            Self::View(ViewKind::Edit) => include_str!("../../templates/views/edit.blade.php.j2"),
            Self::View(ViewKind::Show) => include_str!("../../templates/views/show.blade.php.j2"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "model" => Ok(Self::Model),
            "model:translation" => Ok(Self::TranslationModel),
            "controller" => Ok(Self::Controller),
            _ => s
                .strip_prefix("view:")
                .and_then(|view| view.parse().ok())
                .map(Self::View)
                .ok_or_else(|| RenderError::UnknownTemplate(s.to_string())),
        }
    }
}

/// Renders catalog templates
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer over the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_overrides(None)
    }

    /// Renderer preferring templates found in `dir`
    ///
    /// A template missing from `dir` falls back to its embedded default.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be read or a template fails to
    /// compile.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_syntax(syntax().map_err(|source| RenderError::Template {
            template: "syntax".to_string(),
            source,
        })?);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        for id in TemplateId::ALL {
            let source = match dir.map(|d| d.join(id.file_name())).filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!(template = %id, path = %path.display(), "using template override");
                    std::fs::read_to_string(&path)
                        .map_err(|source| RenderError::ReadOverride { path, source })?
                }
                None => id.embedded_source().to_string(),
            };
            env.add_template_owned(id.as_str().to_string(), source)
                .map_err(|source| RenderError::Template {
                    template: id.as_str().to_string(),
                    source,
                })?;
        }

        Ok(Self { env })
    }

    /// Render a catalog template
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self, id: TemplateId, context: &TemplateContext) -> Result<String, RenderError> {
        let wrap = |source| RenderError::Template {
            template: id.as_str().to_string(),
            source,
        };
        self.env
            .get_template(id.as_str())
            .map_err(wrap)?
            .render(context)
            .map_err(wrap)
    }

    /// Render a template by catalog id string
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTemplate`] for ids outside the catalog.
    pub fn render_named(&self, id: &str, context: &TemplateContext) -> Result<String, RenderError> {
        self.render(id.parse()?, context)
    }
}

fn syntax() -> Result<SyntaxConfig, minijinja::Error> {
    SyntaxConfig::builder()
        .block_delimiters("[%", "%]")
        .variable_delimiters("[[", "]]")
        .comment_delimiters("[#", "#]")
        .build()
}

/// Class name declared in PHP source, if any
///
/// ```
/// use crudgen::template::model_class_name_of;
///
/// let source = "<?php\n\nnamespace App;\n\nclass BlogPost extends Model\n{\n}\n";
/// assert_eq!(model_class_name_of(source).as_deref(), Some("BlogPost"));
/// ```
#[must_use]
pub fn model_class_name_of(source: &str) -> Option<String> {
    let pattern = Regex::new(r"(?m)^\s*(?:abstract\s+|final\s+)?class\s+(\w+)").ok()?;
    pattern
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
