//! Pluralization rulesets for the naming engine
//!
//! The naming engine never calls a global inflector directly; it receives an
//! [`Inflections`] implementation. [`EnglishInflections`] is the default: it
//! consults a table of irregular and uncountable nouns first, keeps words
//! that already read as singular, and falls back to the `Inflector` crate's
//! English rules.

use inflector::Inflector;
use std::collections::{BTreeMap, BTreeSet};

/// A singular/plural ruleset
///
/// Implementations must be total: a word no rule applies to is returned
/// unchanged.
pub trait Inflections {
    /// Singular form of a single word
    fn singular(&self, word: &str) -> String;

    /// Plural form of a single word
    fn plural(&self, word: &str) -> String;

    /// Singularize the last word of a `snake_case` (or spaced, or hyphenated) phrase
    ///
    /// ```
    /// # use crudgen::naming::{EnglishInflections, Inflections};
    /// let rules = EnglishInflections::default();
    /// assert_eq!(rules.singular_phrase("blog_posts"), "blog_post");
    /// assert_eq!(rules.singular_phrase("categories"), "category");
    /// ```
    fn singular_phrase(&self, phrase: &str) -> String {
        map_last_word(phrase, |word| self.singular(word))
    }

    /// Pluralize the last word of a `snake_case` (or spaced, or hyphenated) phrase
    ///
    /// ```
    /// # use crudgen::naming::{EnglishInflections, Inflections};
    /// let rules = EnglishInflections::default();
    /// assert_eq!(rules.plural_phrase("blog_post"), "blog_posts");
    /// ```
    fn plural_phrase(&self, phrase: &str) -> String {
        map_last_word(phrase, |word| self.plural(word))
    }
}

/// Irregular nouns as (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("curriculum", "curricula"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("calf", "calves"),
    ("self", "selves"),
    ("elf", "elves"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("loaf", "loaves"),
    ("thief", "thieves"),
    ("scarf", "scarves"),
    ("alias", "aliases"),
    ("atlas", "atlases"),
    ("bonus", "bonuses"),
    ("bus", "buses"),
    ("campus", "campuses"),
    ("canvas", "canvases"),
    ("census", "censuses"),
    ("gas", "gases"),
    ("lens", "lenses"),
    ("status", "statuses"),
    ("virus", "viruses"),
];

/// Endings of words that are already singular even though they end in `s`
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "as"];

/// Nouns with identical singular and plural forms
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "metadata",
    "feedback",
    "staff",
];

/// English ruleset backed by the `Inflector` crate
#[derive(Debug, Clone)]
pub struct EnglishInflections {
    /// singular → plural
    irregular: BTreeMap<String, String>,
    uncountable: BTreeSet<String>,
}

impl Default for EnglishInflections {
    fn default() -> Self {
        Self {
            irregular: IRREGULAR
                .iter()
                .map(|(s, p)| ((*s).to_string(), (*p).to_string()))
                .collect(),
            uncountable: UNCOUNTABLE.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

impl EnglishInflections {
    /// Create the default English ruleset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an irregular singular/plural pair
    #[must_use]
    pub fn with_irregular(mut self, singular: &str, plural: &str) -> Self {
        self.irregular
            .insert(singular.to_lowercase(), plural.to_lowercase());
        self
    }

    /// Mark a word as uncountable
    #[must_use]
    pub fn with_uncountable(mut self, word: &str) -> Self {
        self.uncountable.insert(word.to_lowercase());
        self
    }

    fn singular_of_irregular(&self, lower: &str) -> Option<&str> {
        self.irregular
            .iter()
            .find(|(_, plural)| plural.as_str() == lower)
            .map(|(singular, _)| singular.as_str())
    }
}

impl Inflections for EnglishInflections {
    fn singular(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if self.uncountable.contains(&lower) || self.irregular.contains_key(&lower) {
            return word.to_string();
        }
        if let Some(singular) = self.singular_of_irregular(&lower) {
            return match_case(word, singular);
        }

        if !lower.ends_with('s') || SINGULAR_ENDINGS.iter().any(|e| lower.ends_with(e)) {
            return word.to_string();
        }
        if lower.ends_with("ves") {
            return word[..word.len() - 1].to_string();
        }

        let singular = word.to_singular();
        if !singular.is_empty() && self.plural(&singular).to_lowercase() == lower {
            singular
        } else {
            word[..word.len() - 1].to_string()
        }
    }

    fn plural(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if self.uncountable.contains(&lower) || self.singular_of_irregular(&lower).is_some() {
            return word.to_string();
        }
        if let Some(plural) = self.irregular.get(&lower) {
            return match_case(word, plural);
        }

        let plural = word.to_plural();
        if plural.is_empty() {
            word.to_string()
        } else {
            plural
        }
    }
}

/// Apply `f` to the last word of a phrase, keeping everything before it
fn map_last_word(phrase: &str, f: impl FnOnce(&str) -> String) -> String {
    match phrase.rfind(|c: char| matches!(c, '_' | ' ' | '-')) {
        Some(idx) => {
            let (head, last) = phrase.split_at(idx + 1);
            format!("{head}{}", f(last))
        }
        None => f(phrase),
    }
}

/// Carry the capitalisation of the original word's first letter over
fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        replacement.to_pascal_case()
    } else {
        replacement.to_string()
    }
}
