//! Anchors locating where a declaration belongs in an existing file

use regex::Regex;

/// A recognisable location in a target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// A placeholder comment; new lines go below it at the same indentation
    Marker(String),
    /// The opening line of a block; new lines go inside it, one level deeper
    ///
    /// Tokens are matched in order with any amount of whitespace between them.
    BlockOpening {
        /// Name used in merge outcomes and logs
        name: String,
        /// Token sequence
        tokens: Vec<String>,
    },
}

/// Where an anchor was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnchorMatch {
    /// Byte offset of the end of the anchor's line, before any line terminator
    pub line_end: usize,
    /// Indentation for the inserted line
    pub indent: String,
}

impl Anchor {
    /// Anchor on a placeholder comment containing `text`
    #[must_use]
    pub fn marker(text: impl Into<String>) -> Self {
        Self::Marker(text.into())
    }

    /// Anchor on a block opening written as source, e.g.
    /// `public function boot(Router $router) {`
    ///
    /// The source is split into word and punctuation tokens, so the anchor
    /// also matches differently spaced or wrapped variants.
    #[must_use]
    pub fn block_opening(name: impl Into<String>, source: &str) -> Self {
        Self::BlockOpening {
            name: name.into(),
            tokens: tokenize(source),
        }
    }

    /// Name of the anchor for reporting
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Marker(text) => text,
            Self::BlockOpening { name, .. } => name,
        }
    }

    pub(crate) fn locate(&self, text: &str) -> Option<AnchorMatch> {
        match self {
            Self::Marker(marker) => {
                if marker.is_empty() {
                    return None;
                }
                let at = text.find(marker.as_str())?;
                let start = line_start(text, at);
                Some(AnchorMatch {
                    line_end: line_end(text, at),
                    indent: leading_whitespace(&text[start..]).to_string(),
                })
            }
            Self::BlockOpening { tokens, .. } => {
                if tokens.is_empty() {
                    return None;
                }
                let pattern = tokens
                    .iter()
                    .map(|t| regex::escape(t))
                    .collect::<Vec<_>>()
                    .join(r"\s*");
                let found = Regex::new(&pattern).ok()?.find(text)?;
                let start = line_start(text, found.start());
                let indent = format!(
                    "{}{}",
                    leading_whitespace(&text[start..]),
                    indent_unit(text)
                );
                Some(AnchorMatch {
                    line_end: line_end(text, found.end()),
                    indent,
                })
            }
        }
    }
}

/// Ordered anchor strategies; the first one found wins
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnchorPolicy {
    anchors: Vec<Anchor>,
}

impl AnchorPolicy {
    /// Policy from an explicit anchor list
    #[must_use]
    pub const fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    /// Route table: the placeholder comment, then the `web` middleware group
    #[must_use]
    pub fn route_table(marker: &str) -> Self {
        Self::new(vec![
            Anchor::marker(marker),
            Anchor::block_opening(
                "web middleware group",
                "Route::group(['middleware' => ['web']], function () {",
            ),
        ])
    }

    /// Route-model bindings: inside the provider's `boot(Router $router)`
    #[must_use]
    pub fn route_bindings() -> Self {
        Self::new(vec![Anchor::block_opening(
            "boot(Router $router)",
            "public function boot(Router $router) {",
        )])
    }

    pub(crate) fn locate(&self, text: &str) -> Option<(&Anchor, AnchorMatch)> {
        self.anchors
            .iter()
            .find_map(|anchor| anchor.locate(text).map(|m| (anchor, m)))
    }
}

fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in source.chars() {
        if c.is_alphanumeric() || matches!(c, '_' | '$' | '\'' | '"' | '\\') {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, at: usize) -> usize {
    let end = text[at..].find('\n').map_or(text.len(), |i| at + i);
    if end > 0 && text.as_bytes()[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn indent_unit(text: &str) -> &'static str {
    if text.lines().any(|l| l.starts_with('\t')) {
        "\t"
    } else {
        "    "
    }
}
