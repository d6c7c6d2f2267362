//! Interactive confirmation on the terminal

use console::style;
use crudgen::overwrite::{overwrite_prompt, Confirm};
use dialoguer::theme::ColorfulTheme;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write as _;
use std::path::Path;

/// Asks on the terminal, showing a diff before replacing a file
///
/// Answers default to no. When stdin is not a terminal every question is
/// answered no.
#[derive(Default)]
pub struct TerminalConfirm {
    theme: ColorfulTheme,
}

impl std::fmt::Debug for TerminalConfirm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalConfirm").finish_non_exhaustive()
    }
}

impl TerminalConfirm {
    /// Create a terminal prompt
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        dialoguer::Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "prompt unavailable; answering no");
                false
            })
    }

    fn confirm_overwrite(&mut self, path: &Path, existing: &str, generated: &str) -> bool {
        if existing == generated {
            println!(
                "{} {}",
                style(path.display()).dim(),
                style("is identical to the generated file").dim()
            );
        } else {
            print!("{}", render_diff(existing, generated, true));
        }
        self.confirm(&overwrite_prompt(path))
    }
}

/// Line diff of `existing` against `generated`
///
/// Removed lines start with `-`, added lines with `+` and unchanged lines
/// with a space. `colored` adds terminal styling.
#[must_use]
pub fn render_diff(existing: &str, generated: &str, colored: bool) -> String {
    let diff = TextDiff::from_lines(existing, generated);
    let mut out = String::new();

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{change}"),
            ChangeTag::Insert => format!("+{change}"),
            ChangeTag::Equal => format!(" {change}"),
        };
        let line = if change.missing_newline() {
            line + "\n"
        } else {
            line
        };
        if colored {
            let styled = match change.tag() {
                ChangeTag::Delete => style(line).red(),
                ChangeTag::Insert => style(line).green(),
                ChangeTag::Equal => style(line),
            };
            let _ = write!(out, "{styled}");
        } else {
            out.push_str(&line);
        }
    }

    out
}
