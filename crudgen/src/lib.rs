//! CRUD scaffold generation for Laravel-style applications
//!
//! Given a table name, crudgen reads the table's columns and generates an
//! Eloquent model, a resource controller, Blade views and the route and
//! route-model binding registrations for a create/read/update/delete workflow.
//!
//! The pieces are usable on their own:
//!
//! - [`naming`] derives every identifier from the table name
//! - [`metadata`] describes table columns and where they come from
//! - [`template`] renders the file catalog
//! - [`merge`] inserts single-line declarations into existing files without
//!   duplicating them
//! - [`overwrite`] decides whether an existing file may be replaced
//! - [`translation`] plans and provisions per-locale companion tables
//! - [`generator`] runs all of the above against a project tree
//!
//! # Example
//!
//! ```no_run
//! use crudgen::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = SchemaFile::load("schema.toml".as_ref())?.into_metadata();
//! let generator = ScaffoldGenerator::new(".", ScaffoldConfig::load(".".as_ref(), None)?)?;
//!
//! let report = generator.run(
//!     "blog_posts",
//!     &NameOverrides::default().with_base_route("Admin"),
//!     Collaborators {
//!         metadata: &metadata,
//!         confirm: &mut AutoConfirm(false),
//!         migrations: &mut RecordingMigrations::default(),
//!     },
//! )?;
//! println!("{} files written", report.written().count());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod generator;
pub mod merge;
pub mod metadata;
pub mod naming;
pub mod overwrite;
pub mod template;
pub mod translation;

pub use error::{Result, ScaffoldError};

/// Commonly used types
pub mod prelude {
    pub use crate::config::ScaffoldConfig;
    pub use crate::error::{Result, ScaffoldError};
    pub use crate::generator::{
        Collaborators, GeneratedArtifact, MergeReport, MergeStatus, ScaffoldGenerator,
        ScaffoldPlan, ScaffoldReport,
    };
    pub use crate::merge::{merge_line, AnchorPolicy, MergeOutcome, Merged};
    pub use crate::metadata::{
        ColumnDescriptor, ColumnKind, Columns, MetadataError, MetadataSource, SchemaFile,
        StaticMetadata,
    };
    pub use crate::naming::{derive_names, NameOverrides, NamingContext};
    pub use crate::overwrite::{AutoConfirm, Confirm, ScriptedConfirm, WriteDecision};
    pub use crate::template::{TemplateId, TemplateRenderer};
    pub use crate::translation::{
        parse_translatable_fields, MigrationCollaborator, MigrationError, ProvisionOutcome,
        RecordingMigrations,
    };
}
