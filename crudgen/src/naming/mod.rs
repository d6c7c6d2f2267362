//! Identifier derivation for a scaffold
//!
//! Every name used by the generated files (class names, route segments, view
//! directories, translation tables) is derived here from the raw table name
//! and a handful of optional overrides. Derivation is a pure function: the same
//! table, overrides and ruleset always produce the same [`NamingContext`].
//!
//! # Examples
//!
//! ```
//! use crudgen::naming::{derive_names, NameOverrides};
//!
//! let names = derive_names("blog_posts", &NameOverrides::default());
//! assert_eq!(names.model_class_name, "BlogPost");
//! assert_eq!(names.controller_class_name, "BlogPostController");
//! assert_eq!(names.route_segment, "blog-post");
//! assert_eq!(names.model_variable_name, "blogPost");
//! ```

mod inflections;

pub use inflections::{EnglishInflections, Inflections};

use inflector::Inflector;
use serde::Serialize;

/// Default suffix appended to the singular table name for translation tables
pub const DEFAULT_TRANSLATION_SUFFIX: &str = "_translations";

/// Root namespace of generated models
const MODEL_ROOT_NAMESPACE: &str = "App";

/// Root namespace of generated controllers
const CONTROLLER_ROOT_NAMESPACE: &str = "App\\Http\\Controllers";

/// Optional inputs to name derivation
///
/// Empty strings are treated the same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOverrides {
    /// Route prefix and controller sub-namespace, e.g. `Admin`
    pub base_route: Option<String>,
    /// Subdirectory (and sub-namespace) of the model under `app/`
    pub model_subdirectory: Option<String>,
    /// Suffix of the translation table, default [`DEFAULT_TRANSLATION_SUFFIX`]
    pub translation_suffix: Option<String>,
    /// Columns stored per locale in the translation table
    pub translatable_fields: Vec<String>,
}

impl NameOverrides {
    /// Set the base route
    #[must_use]
    pub fn with_base_route(mut self, base: impl Into<String>) -> Self {
        self.base_route = Some(base.into());
        self
    }

    /// Set the model subdirectory
    #[must_use]
    pub fn with_model_subdirectory(mut self, dir: impl Into<String>) -> Self {
        self.model_subdirectory = Some(dir.into());
        self
    }

    /// Set the translation table suffix
    #[must_use]
    pub fn with_translation_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.translation_suffix = Some(suffix.into());
        self
    }

    /// Set the translatable fields
    #[must_use]
    pub fn with_translatable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translatable_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// All identifiers derived for one table
///
/// Computed once per run and never mutated afterwards. Serialized directly into
/// template contexts, so field names double as template variable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingContext {
    /// The raw table name
    pub table_name: String,
    /// `PascalCase` singular, e.g. `BlogPost`
    pub model_class_name: String,
    /// Model class name plus `Controller`
    pub controller_class_name: String,
    /// `camelCase` singular, e.g. `blogPost`
    pub model_variable_name: String,
    /// Slugged singular, prefixed by the base route when set, e.g. `Admin/blog-post`
    pub route_segment: String,
    /// Lowercased route segment as used in route declarations
    pub route_path: String,
    /// Resource wildcard name, e.g. `blog_post`
    pub route_parameter: String,
    /// Singular table name, e.g. `blog_post`
    pub views_directory_name: String,
    /// Dotted view prefix, e.g. `admin.blog_post`
    pub view_namespace: String,
    /// Slash-separated view directory relative to the views root
    pub views_relative_dir: String,
    /// Capitalised singular words, e.g. `Blog Post`
    pub title_singular: String,
    /// Capitalised plural words, e.g. `Blog Posts`
    pub title_plural: String,
    /// PHP namespace of the model class
    pub model_namespace: String,
    /// PHP namespace of the controller class
    pub controller_namespace: String,
    /// Model subdirectory under `app/`, if any
    pub model_subdirectory: Option<String>,
    /// Base route as given, if any
    pub base_route: Option<String>,
    /// Resolved translation table suffix
    pub translation_suffix: String,
    /// Translatable columns, empty strings removed
    pub translatable_fields: Vec<String>,
    /// Translation table, only when translatable fields are configured
    pub translation_table_name: Option<String>,
    /// Translation model class, only when translatable fields are configured
    pub translation_class_name: Option<String>,
}

impl NamingContext {
    /// Whether the table has per-locale columns
    #[must_use]
    pub fn is_translatable(&self) -> bool {
        self.translation_table_name.is_some()
    }

    /// Fully qualified model class
    #[must_use]
    pub fn model_fqcn(&self) -> String {
        format!("{}\\{}", self.model_namespace, self.model_class_name)
    }

    /// Controller reference as written in the route table, relative to the
    /// controllers root namespace
    #[must_use]
    pub fn controller_reference(&self) -> String {
        self.base_route.as_ref().map_or_else(
            || self.controller_class_name.clone(),
            |base| format!("{}\\{}", base.replace('/', "\\"), self.controller_class_name),
        )
    }

    /// Named route for a resource action, e.g. `admin.blog-post.index`
    #[must_use]
    pub fn route_name(&self, action: &str) -> String {
        format!("{}.{action}", self.route_path.replace('/', "."))
    }

    /// View name for one of the generated views, e.g. `admin.blog_post.index`
    #[must_use]
    pub fn view_name(&self, view: &str) -> String {
        format!("{}.{view}", self.view_namespace)
    }

    /// Line registering the resource routes
    ///
    /// ```
    /// # use crudgen::naming::{derive_names, NameOverrides};
    /// let names = derive_names("blog_posts", &NameOverrides::default().with_base_route("Admin"));
    /// assert_eq!(
    ///     names.route_declaration(),
    ///     "Route::resource('admin/blog-post', 'Admin\\BlogPostController');"
    /// );
    /// ```
    #[must_use]
    pub fn route_declaration(&self) -> String {
        format!(
            "Route::resource('{}', '{}');",
            self.route_path,
            self.controller_reference()
        )
    }

    /// Line binding the route wildcard to the model
    ///
    /// ```
    /// # use crudgen::naming::{derive_names, NameOverrides};
    /// let names = derive_names("blog_posts", &NameOverrides::default());
    /// assert_eq!(
    ///     names.binding_declaration(),
    ///     "$router->model('blog_post', 'App\\BlogPost');"
    /// );
    /// ```
    #[must_use]
    pub fn binding_declaration(&self) -> String {
        format!(
            "$router->model('{}', '{}');",
            self.route_parameter,
            self.model_fqcn()
        )
    }
}

/// Derive names with the default English ruleset
#[must_use]
pub fn derive_names(table: &str, overrides: &NameOverrides) -> NamingContext {
    derive_names_with(table, overrides, &EnglishInflections::default())
}

/// Derive names with an explicit pluralization ruleset
///
/// Never fails; degenerate input produces degenerate (but deterministic) names.
#[must_use]
pub fn derive_names_with(
    table: &str,
    overrides: &NameOverrides,
    rules: &dyn Inflections,
) -> NamingContext {
    let base_route = non_empty(overrides.base_route.as_deref());
    let model_subdirectory = non_empty(overrides.model_subdirectory.as_deref())
        .map(|dir| dir.trim_matches('/').to_string());
    let translation_suffix = non_empty(overrides.translation_suffix.as_deref())
        .unwrap_or_else(|| DEFAULT_TRANSLATION_SUFFIX.to_string());
    let translatable_fields: Vec<String> = overrides
        .translatable_fields
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    let singular = rules.singular_phrase(table);
    let plural = rules.plural_phrase(&singular);
    let slug = singular.to_kebab_case();

    let route_segment = base_route
        .as_ref()
        .map_or_else(|| slug.clone(), |base| format!("{base}/{slug}"));
    let route_path = route_segment.to_lowercase();
    let route_parameter = route_path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .replace('-', "_");

    let view_prefix = base_route
        .as_ref()
        .map(|base| base.trim_matches('/').to_lowercase());
    let view_namespace = view_prefix.as_ref().map_or_else(
        || singular.clone(),
        |prefix| format!("{}.{singular}", prefix.replace('/', ".")),
    );
    let views_relative_dir = view_prefix
        .as_ref()
        .map_or_else(|| singular.clone(), |prefix| format!("{prefix}/{singular}"));

    let model_namespace = model_subdirectory.as_ref().map_or_else(
        || MODEL_ROOT_NAMESPACE.to_string(),
        |dir| format!("{MODEL_ROOT_NAMESPACE}\\{}", dir.replace('/', "\\")),
    );
    let controller_namespace = base_route.as_ref().map_or_else(
        || CONTROLLER_ROOT_NAMESPACE.to_string(),
        |base| format!("{CONTROLLER_ROOT_NAMESPACE}\\{}", base.replace('/', "\\")),
    );

    let (translation_table_name, translation_class_name) = if translatable_fields.is_empty() {
        (None, None)
    } else {
        let table = format!(
            "{}{}",
            singular.to_lowercase(),
            rules.plural_phrase(&translation_suffix)
        );
        let class = format!("{singular}{}", rules.singular_phrase(&translation_suffix))
            .to_pascal_case();
        (Some(table), Some(class))
    };

    let model_class_name = singular.to_pascal_case();

    NamingContext {
        table_name: table.to_string(),
        controller_class_name: format!("{model_class_name}Controller"),
        model_class_name,
        model_variable_name: singular.to_camel_case(),
        route_segment,
        route_path,
        route_parameter,
        views_directory_name: singular.clone(),
        view_namespace,
        views_relative_dir,
        title_singular: singular.to_title_case(),
        title_plural: plural.to_title_case(),
        model_namespace,
        controller_namespace,
        model_subdirectory,
        base_route,
        translation_suffix,
        translatable_fields,
        translation_table_name,
        translation_class_name,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blog_posts_names() {
        let names = derive_names("blog_posts", &NameOverrides::default());
        assert_eq!(names.model_class_name, "BlogPost");
        assert_eq!(names.controller_class_name, "BlogPostController");
        assert_eq!(names.route_segment, "blog-post");
        assert_eq!(names.model_variable_name, "blogPost");
        assert_eq!(names.views_directory_name, "blog_post");
        assert_eq!(names.title_singular, "Blog Post");
        assert_eq!(names.title_plural, "Blog Posts");
        assert_eq!(names.route_parameter, "blog_post");
        assert_eq!(names.model_namespace, "App");
        assert_eq!(names.controller_namespace, "App\\Http\\Controllers");
        assert!(names.translation_table_name.is_none());
        assert!(!names.is_translatable());
    }

    #[test]
    fn test_base_route_prefixes_segment_and_namespaces() {
        let overrides = NameOverrides::default().with_base_route("Admin");
        let names = derive_names("blog_posts", &overrides);
        assert_eq!(names.route_segment, "Admin/blog-post");
        assert_eq!(names.route_path, "admin/blog-post");
        assert_eq!(names.route_parameter, "blog_post");
        assert_eq!(names.controller_namespace, "App\\Http\\Controllers\\Admin");
        assert_eq!(names.controller_reference(), "Admin\\BlogPostController");
        assert_eq!(names.view_namespace, "admin.blog_post");
        assert_eq!(names.views_relative_dir, "admin/blog_post");
        assert_eq!(names.route_name("index"), "admin.blog-post.index");
        assert_eq!(names.view_name("edit"), "admin.blog_post.edit");
    }

    #[test]
    fn test_model_subdirectory_namespace() {
        let overrides = NameOverrides::default().with_model_subdirectory("Models/Blog/");
        let names = derive_names("posts", &overrides);
        assert_eq!(names.model_namespace, "App\\Models\\Blog");
        assert_eq!(names.model_fqcn(), "App\\Models\\Blog\\Post");
        assert_eq!(
            names.binding_declaration(),
            "$router->model('post', 'App\\Models\\Blog\\Post');"
        );
    }

    #[test]
    fn test_empty_overrides_are_not_set() {
        let overrides = NameOverrides::default()
            .with_base_route("")
            .with_model_subdirectory("  ")
            .with_translation_suffix("")
            .with_translatable_fields(["", " "]);
        assert_eq!(
            derive_names("posts", &overrides),
            derive_names("posts", &NameOverrides::default())
        );
    }

    #[test]
    fn test_translation_names() {
        let overrides = NameOverrides::default().with_translatable_fields(["title", "body"]);
        let names = derive_names("posts", &overrides);
        assert_eq!(names.translation_table_name.as_deref(), Some("post_translations"));
        assert_eq!(names.translation_class_name.as_deref(), Some("PostTranslation"));
        assert_eq!(names.translatable_fields, vec!["title", "body"]);
        assert!(names.is_translatable());
    }

    #[test]
    fn test_custom_translation_suffix() {
        let overrides = NameOverrides::default()
            .with_translatable_fields(["name"])
            .with_translation_suffix("_locales");
        let names = derive_names("product_categories", &overrides);
        assert_eq!(
            names.translation_table_name.as_deref(),
            Some("product_category_locales")
        );
        assert_eq!(
            names.translation_class_name.as_deref(),
            Some("ProductCategoryLocale")
        );
    }

    #[test]
    fn test_irregular_table_name() {
        let names = derive_names("people", &NameOverrides::default());
        assert_eq!(names.model_class_name, "Person");
        assert_eq!(names.title_plural, "People");
        assert_eq!(names.route_segment, "person");
    }

    #[test]
    fn test_custom_ruleset_is_used() {
        let rules = EnglishInflections::default().with_irregular("octopus", "octopodes");
        let names = derive_names_with("octopodes", &NameOverrides::default(), &rules);
        assert_eq!(names.model_class_name, "Octopus");
        assert_eq!(names.title_plural, "Octopodes");
    }

    #[test]
    fn test_declarations() {
        let names = derive_names("blog_posts", &NameOverrides::default());
        assert_eq!(
            names.route_declaration(),
            "Route::resource('blog-post', 'BlogPostController');"
        );
        assert_eq!(
            names.binding_declaration(),
            "$router->model('blog_post', 'App\\BlogPost');"
        );
    }

    proptest! {
        #[test]
        fn prop_derive_names_is_deterministic(
            table in "[a-z][a-z0-9_]{0,24}",
            base in proptest::option::of("[A-Za-z]{1,8}"),
            fields in proptest::collection::vec("[a-z]{1,8}", 0..4),
        ) {
            let mut overrides = NameOverrides::default().with_translatable_fields(fields);
            overrides.base_route = base;
            let first = derive_names(&table, &overrides);
            let second = derive_names(&table, &overrides);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_controller_extends_model_name(table in "[a-z]{1,12}(_[a-z]{1,12}){0,2}") {
            let names = derive_names(&table, &NameOverrides::default());
            prop_assert_eq!(
                names.controller_class_name,
                format!("{}Controller", names.model_class_name)
            );
            prop_assert!(!names.route_path.chars().any(char::is_uppercase));
        }
    }
}
