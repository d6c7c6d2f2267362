//! crudgen CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use crudgen_cli_lib::commands::{load_config, resolve_project_root, ScaffoldCommand, TemplatesCommand};
use crudgen_cli_lib::observability;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crudgen")]
#[command(version)]
#[command(about = "Generate CRUD scaffolds for Laravel applications from database tables", long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,
    /// Configuration file (defaults to `crud.toml` in the project root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model, controller, views and routes for a table
    Scaffold {
        /// Table name (e.g., `blog_posts`)
        table: String,
        /// Route prefix and controller sub-namespace (e.g., `Admin`)
        #[arg(long)]
        route_base: Option<String>,
        /// Model subdirectory under the models path
        #[arg(long)]
        model_dir: Option<String>,
        /// Translatable columns (e.g., `title,body` or `["title","body"]`)
        #[arg(long)]
        translatable_fields: Option<String>,
        /// Translation table suffix (defaults to `_translations`)
        #[arg(long)]
        translate_suffix: Option<String>,
        /// TOML schema file describing the tables
        #[arg(long, conflicts_with = "database_url")]
        schema: Option<PathBuf>,
        /// Database to introspect (sqlite://, postgres://, mysql://)
        #[arg(long)]
        database_url: Option<String>,
        /// Overwrite existing files without asking
        #[arg(long, conflicts_with = "no_interaction")]
        force: bool,
        /// Never prompt; keep existing files
        #[arg(long)]
        no_interaction: bool,
    },
    /// Manage scaffold templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.verbose);

    let project_root = resolve_project_root(cli.project_root.as_deref())?;
    let config = load_config(&project_root, cli.config.as_deref())?;

    match cli.command {
        Commands::Scaffold {
            table,
            route_base,
            model_dir,
            translatable_fields,
            translate_suffix,
            schema,
            database_url,
            force,
            no_interaction,
        } => {
            let cmd = ScaffoldCommand {
                table,
                route_base,
                model_dir,
                translatable_fields,
                translate_suffix,
                schema,
                database_url,
                force,
                no_interaction,
            };
            cmd.execute(&project_root, config)?;
        }
        Commands::Templates { command } => {
            command.execute(&project_root, &config)?;
        }
    }

    Ok(())
}
