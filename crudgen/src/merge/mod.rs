//! Idempotent single-line merges into existing source files
//!
//! Route and binding registrations are inserted into hand-maintained files
//! (the route table, the route service provider). A merge never duplicates a
//! declaration and never fails: when no anchor is found the line is appended
//! and a warning is logged so the user can move it by hand.

mod anchor;

pub use anchor::{Anchor, AnchorPolicy};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// What a merge did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The declaration was already in the file; nothing changed
    AlreadyPresent,
    /// Inserted on a new line below the named anchor
    InsertedAfterAnchor {
        /// Name of the anchor that matched
        anchor: String,
    },
    /// No anchor matched; appended at the end of the file
    Appended,
}

/// Merge result: the new text and how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Full file content after the merge
    pub text: String,
    /// How the declaration was placed
    pub outcome: MergeOutcome,
}

impl Merged {
    /// False only when the declaration was already present
    #[must_use]
    pub fn was_inserted(&self) -> bool {
        self.outcome != MergeOutcome::AlreadyPresent
    }
}

/// Failures of [`merge_into_file`]
#[derive(Debug, Error)]
pub enum FileMergeError {
    /// The target file does not exist
    #[error("merge target {path} does not exist")]
    Missing {
        /// Target path
        path: PathBuf,
    },

    /// Reading or writing the target failed
    #[error("failed to update {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Insert `declaration` into `existing` unless it is already there
///
/// # Examples
///
/// ```
/// use crudgen::merge::{merge_line, AnchorPolicy, MergeOutcome};
///
/// let routes = "<?php\n// crud routes go here\n";
/// let merged = merge_line(
///     routes,
///     "Route::resource('post', 'PostController');",
///     &AnchorPolicy::route_table("crud routes go here"),
/// );
/// assert_eq!(
///     merged.text,
///     "<?php\n// crud routes go here\nRoute::resource('post', 'PostController');\n"
/// );
/// assert!(matches!(merged.outcome, MergeOutcome::InsertedAfterAnchor { .. }));
/// ```
#[must_use]
pub fn merge_line(existing: &str, declaration: &str, policy: &AnchorPolicy) -> Merged {
    let declaration = declaration.trim();
    if existing.contains(declaration) {
        return Merged {
            text: existing.to_string(),
            outcome: MergeOutcome::AlreadyPresent,
        };
    }

    let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };

    if let Some((anchor, found)) = policy.locate(existing) {
        let mut text = String::with_capacity(existing.len() + declaration.len() + 8);
        text.push_str(&existing[..found.line_end]);
        text.push_str(newline);
        text.push_str(&found.indent);
        text.push_str(declaration);
        text.push_str(&existing[found.line_end..]);
        if found.line_end == existing.len() {
            text.push_str(newline);
        }
        tracing::debug!(anchor = anchor.name(), declaration, "inserted declaration after anchor");
        return Merged {
            text,
            outcome: MergeOutcome::InsertedAfterAnchor {
                anchor: anchor.name().to_string(),
            },
        };
    }

    tracing::warn!(
        declaration,
        "no anchor found; appended declaration at end of file, verify its placement manually"
    );
    let mut text = existing.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push_str(newline);
    }
    text.push_str(declaration);
    text.push_str(newline);
    Merged {
        text,
        outcome: MergeOutcome::Appended,
    }
}

/// Merge a declaration into a file on disk
///
/// The file is only rewritten when the declaration was inserted.
///
/// # Errors
///
/// Returns [`FileMergeError::Missing`] if the file does not exist, or an I/O
/// error if it cannot be read or written.
pub fn merge_into_file(
    path: &Path,
    declaration: &str,
    policy: &AnchorPolicy,
) -> Result<Merged, FileMergeError> {
    if !path.exists() {
        return Err(FileMergeError::Missing {
            path: path.to_path_buf(),
        });
    }

    let io_err = |source| FileMergeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let existing = std::fs::read_to_string(path).map_err(io_err)?;
    let merged = merge_line(&existing, declaration, policy);
    if merged.was_inserted() {
        std::fs::write(path, &merged.text).map_err(io_err)?;
    }
    Ok(merged)
}
