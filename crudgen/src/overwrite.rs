//! Overwrite decisions for generated files
//!
//! A target that does not exist is always written. An existing target is
//! only replaced when the [`Confirm`] collaborator agrees.

use std::collections::VecDeque;
use std::path::Path;

/// Answers yes/no questions, usually by asking the user
pub trait Confirm {
    /// Ask `prompt`; `true` means yes
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Ask whether to replace `existing` with `generated` at `path`
    ///
    /// Interactive implementations override this to show a diff first.
    fn confirm_overwrite(&mut self, path: &Path, _existing: &str, _generated: &str) -> bool {
        self.confirm(&overwrite_prompt(path))
    }
}

/// Prompt used when a generated file already exists
#[must_use]
pub fn overwrite_prompt(path: &Path) -> String {
    format!("{} already exists. Overwrite it?", path.display())
}

/// Always gives the same answer
///
/// `AutoConfirm(true)` backs `--force`, `AutoConfirm(false)` backs
/// `--no-interaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "answered automatically");
        self.0
    }
}

/// Replays a fixed list of answers and records the prompts it saw
///
/// Once the answers run out every further prompt is answered with `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
}

impl ScriptedConfirm {
    /// Script the given answers in order
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts asked so far
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }

    fn confirm_overwrite(&mut self, path: &Path, existing: &str, generated: &str) -> bool {
        (**self).confirm_overwrite(path, existing, generated)
    }
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }

    fn confirm_overwrite(&mut self, path: &Path, existing: &str, generated: &str) -> bool {
        (**self).confirm_overwrite(path, existing, generated)
    }
}

/// Outcome of an overwrite decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Target is absent; write it
    Create,
    /// Target exists and replacement was confirmed
    Overwrite,
    /// Target exists and replacement was declined
    Keep,
}

impl WriteDecision {
    /// Whether the file should be written
    #[must_use]
    pub const fn should_write(self) -> bool {
        matches!(self, Self::Create | Self::Overwrite)
    }
}

/// Decide whether to write `path`
///
/// `confirm` is never called when `exists` reports the path absent.
pub fn should_write<E, C>(path: &Path, exists: E, confirm: C) -> bool
where
    E: FnOnce(&Path) -> bool,
    C: FnOnce(&Path) -> bool,
{
    !exists(path) || confirm(path)
}

/// Decide how to treat `path`, asking `confirm` only when it already exists
pub fn decide(path: &Path, confirm: &mut dyn Confirm) -> WriteDecision {
    decide_with(path, Path::exists, confirm)
}

/// [`decide`] with an explicit existence check
pub fn decide_with<E>(path: &Path, exists: E, confirm: &mut dyn Confirm) -> WriteDecision
where
    E: FnOnce(&Path) -> bool,
{
    if !exists(path) {
        return WriteDecision::Create;
    }
    if confirm.confirm(&overwrite_prompt(path)) {
        WriteDecision::Overwrite
    } else {
        WriteDecision::Keep
    }
}

/// Decide how to treat `path` given the content about to be written
///
/// Like [`decide`], but lets the collaborator compare the current file with
/// `generated` before answering. An unreadable existing file is compared as
/// empty.
pub fn decide_for_content(path: &Path, generated: &str, confirm: &mut dyn Confirm) -> WriteDecision {
    if !path.exists() {
        return WriteDecision::Create;
    }
    let existing = std::fs::read_to_string(path).unwrap_or_default();
    if confirm.confirm_overwrite(path, &existing, generated) {
        WriteDecision::Overwrite
    } else {
        WriteDecision::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_absent_path_never_asks() {
        let asked = Cell::new(false);
        let write = should_write(
            Path::new("app/Post.php"),
            |_| false,
            |_| {
                asked.set(true);
                false
            },
        );
        assert!(write);
        assert!(!asked.get());
    }

    #[test]
    fn test_present_path_follows_confirmation() {
        assert!(should_write(Path::new("a"), |_| true, |_| true));
        assert!(!should_write(Path::new("a"), |_| true, |_| false));
    }

    #[test]
    fn test_decide_scripted() {
        let mut confirm = ScriptedConfirm::new([true, false]);
        assert_eq!(
            decide_with(Path::new("a.php"), |_| true, &mut confirm),
            WriteDecision::Overwrite
        );
        assert_eq!(
            decide_with(Path::new("b.php"), |_| true, &mut confirm),
            WriteDecision::Keep
        );
        assert_eq!(
            decide_with(Path::new("c.php"), |_| false, &mut confirm),
            WriteDecision::Create
        );
        assert_eq!(confirm.prompts().len(), 2);
        assert!(confirm.prompts()[0].starts_with("a.php already exists"));
    }

    #[test]
    fn test_exhausted_script_declines() {
        let mut confirm = ScriptedConfirm::new([]);
        assert!(!confirm.confirm("again?"));
    }

    #[test]
    fn test_declined_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Post.php");
        std::fs::write(&path, "original").unwrap();

        let decision = decide(&path, &mut AutoConfirm(false));
        if decision.should_write() {
            std::fs::write(&path, "generated").unwrap();
        }

        assert_eq!(decision, WriteDecision::Keep);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_default_overwrite_confirmation_asks_plain_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Post.php");
        std::fs::write(&path, "old").unwrap();
        let mut confirm = ScriptedConfirm::new([true]);

        assert_eq!(
            decide_for_content(&path, "new", &mut confirm),
            WriteDecision::Overwrite
        );
        assert_eq!(confirm.prompts(), [overwrite_prompt(&path)]);
    }

    #[test]
    fn test_decide_for_content_sees_both_versions() {
        struct Recorder(Vec<(String, String)>);

        impl Confirm for Recorder {
            fn confirm(&mut self, _prompt: &str) -> bool {
                unreachable!("confirm_overwrite is overridden")
            }

            fn confirm_overwrite(&mut self, _path: &Path, existing: &str, generated: &str) -> bool {
                self.0.push((existing.to_string(), generated.to_string()));
                true
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Post.php");
        let mut recorder = Recorder(Vec::new());

        assert_eq!(
            decide_for_content(&path, "new", &mut recorder),
            WriteDecision::Create
        );
        std::fs::write(&path, "old").unwrap();
        assert_eq!(
            decide_for_content(&path, "new", &mut recorder),
            WriteDecision::Overwrite
        );
        assert_eq!(recorder.0, vec![("old".to_string(), "new".to_string())]);
    }
}
