//! Template catalog commands
//!
//! - `list` - Show every template and whether the project overrides it
//! - `publish` - Copy the embedded defaults into the project for editing
//! - `diff` - Show how an override differs from its default

use crate::prompt::render_diff;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use console::{style, Emoji};
use crudgen::config::ScaffoldConfig;
use crudgen::template::TemplateId;
use std::path::{Path, PathBuf};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CUSTOM: Emoji<'_, '_> = Emoji("✨ ", "* ");
static DEFAULT: Emoji<'_, '_> = Emoji("  ", "  ");

/// Override directory used when `[templates] dir` is unset
pub const DEFAULT_PUBLISH_DIR: &str = "resources/crudgen";

/// Template subcommands
#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List catalog templates and their override status
    List,
    /// Write the embedded templates to an override directory
    Publish {
        /// Target directory, relative to the project root
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Replace templates that were already published
        #[arg(long)]
        force: bool,
    },
    /// Show the difference between an override and its default
    Diff {
        /// Catalog id, e.g. `model` or `view:index`
        template: String,
    },
}

impl TemplatesCommand {
    /// Execute the templates command
    ///
    /// # Errors
    ///
    /// Returns error if a template cannot be read or written.
    pub fn execute(self, project_root: &Path, config: &ScaffoldConfig) -> Result<()> {
        match self {
            Self::List => {
                list_templates(project_root, config);
                Ok(())
            }
            Self::Publish { dir, force } => {
                let dir = dir
                    .or_else(|| config.templates.dir.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLISH_DIR));
                let written = publish_templates(&project_root.join(&dir), force)?;
                println!(
                    "\n  {} published, {} already present",
                    style(written.len()).green(),
                    style(TemplateId::ALL.len() - written.len()).dim()
                );
                if config.templates.dir.as_deref() != Some(dir.as_path()) {
                    println!(
                        "\n  Add {} to crud.toml to use them",
                        style(format!("[templates]\n  dir = \"{}\"", dir.display())).yellow()
                    );
                }
                Ok(())
            }
            Self::Diff { template } => diff_template(project_root, config, &template),
        }
    }
}

fn override_dir(project_root: &Path, config: &ScaffoldConfig) -> Option<PathBuf> {
    config.templates.dir.as_ref().map(|dir| project_root.join(dir))
}

/// List catalog templates and their customization status
fn list_templates(project_root: &Path, config: &ScaffoldConfig) {
    let dir = override_dir(project_root, config);

    println!("Scaffold Templates");
    println!();
    match &dir {
        Some(dir) => println!("  Overrides: {}", style(dir.display()).cyan()),
        None => println!("  Overrides: {}", style("none configured").dim()),
    }
    println!();

    let mut customized = 0;
    for id in TemplateId::ALL {
        let is_customized = dir.as_ref().is_some_and(|d| d.join(id.file_name()).is_file());
        if is_customized {
            customized += 1;
            println!(
                "    {CUSTOM}{} {}",
                style(format!("{:<20}", id.as_str())).yellow(),
                style(id.file_name()).dim()
            );
        } else {
            println!(
                "    {DEFAULT}{} {}",
                style(format!("{:<20}", id.as_str())).dim(),
                style(id.file_name()).dim()
            );
        }
    }

    println!();
    println!(
        "  {} customized, {} default",
        style(customized).yellow(),
        style(TemplateId::ALL.len() - customized).dim()
    );
}

/// Write every embedded template below `dir`
///
/// Existing files are kept unless `force` is set. Returns the templates
/// written.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn publish_templates(dir: &Path, force: bool) -> Result<Vec<TemplateId>> {
    let mut written = Vec::new();

    for id in TemplateId::ALL {
        let path = dir.join(id.file_name());
        if path.exists() && !force {
            println!("  {} {} (kept)", style("-").dim(), style(path.display()).dim());
            continue;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&path, id.embedded_source())
            .with_context(|| format!("Failed to write template: {}", path.display()))?;

        println!("  {CHECK}{}", style(path.display()).dim());
        written.push(id);
    }

    Ok(written)
}

/// Show diff between an override and the embedded default
fn diff_template(project_root: &Path, config: &ScaffoldConfig, name: &str) -> Result<()> {
    let id: TemplateId = name.parse()?;
    let Some(dir) = override_dir(project_root, config) else {
        bail!("No template override directory configured");
    };

    let path = dir.join(id.file_name());
    if !path.is_file() {
        bail!("Template '{id}' is not customized");
    }
    let custom = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read template: {}", path.display()))?;

    println!("{}", style(format!("--- {id} (default)")).red());
    println!("{}", style(format!("+++ {}", path.display())).green());
    print!("{}", render_diff(id.embedded_source(), &custom, true));

    Ok(())
}
