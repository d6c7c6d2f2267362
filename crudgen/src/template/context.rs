//! Template context construction
//!
//! Everything a template needs is precomputed here so templates stay free of
//! type dispatch: per-column markup, validation rules, relations and route
//! names are plain strings by the time rendering starts.

use super::markup;
use crate::metadata::{ColumnDescriptor, ColumnKind, Columns};
use crate::naming::{Inflections, NamingContext};
use inflector::Inflector;
use serde::Serialize;

/// Presentation settings that are not derived from the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Blade layout the views extend
    pub layout: String,
    /// Column of related models shown in selects and cells
    pub display_field: String,
    /// Page size of the index listing
    pub per_page: u32,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            layout: "layouts.app".to_string(),
            display_field: "name".to_string(),
            per_page: 15,
        }
    }
}

/// A `belongsTo` relation derived from a foreign key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationContext {
    /// Relation method name, e.g. `category`
    pub method: String,
    /// Related model class
    pub model_class: String,
    /// Related model class with namespace
    pub model_fqcn: String,
    /// Referenced table
    pub table: String,
    /// Referenced column
    pub column: String,
    /// Local foreign key column
    pub foreign_key: String,
    /// Column of the related model used for display
    pub display_field: String,
}

/// One column as seen by templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldContext {
    /// Column name
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Type tag (`int`, `string`, ...)
    pub kind: String,
    /// Raw SQL type
    pub data_type: String,
    /// Whether NULL is allowed
    pub nullable: bool,
    /// Whether this is the primary key
    pub primary_key: bool,
    /// Whether the column appears in forms
    pub editable: bool,
    /// Whether the column is stored per locale
    pub translatable: bool,
    /// Whether string search uses `LIKE`
    pub fuzzy_search: bool,
    /// Whether search compares dates only
    pub date_search: bool,
    /// Relation when the column is a foreign key
    pub relation: Option<RelationContext>,
    /// Create-form control, absent for non-editable columns
    pub create_input: Option<String>,
    /// Edit-form control, absent for non-editable columns
    pub edit_input: Option<String>,
    /// Index view search control
    pub search_input: String,
    /// Index and show view display
    pub cell: String,
    /// Validation rules, absent for non-editable columns
    pub validation: Option<String>,
}

/// Named routes of the resource
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteNames {
    pub index: String,
    pub create: String,
    pub store: String,
    pub show: String,
    pub edit: String,
    pub update: String,
    pub destroy: String,
}

/// Full rendering context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// Derived identifiers
    pub names: NamingContext,
    /// All columns in declaration order
    pub fields: Vec<FieldContext>,
    /// Relations of foreign key columns
    pub relations: Vec<RelationContext>,
    /// Route names per resource action
    pub routes: RouteNames,
    /// Variable holding the paginated collection, e.g. `blogPosts`
    pub collection_variable: String,
    /// Column shown in the edit heading
    pub heading_field: String,
    /// Primary key column
    pub primary_key: String,
    /// Boolean and JSON casts as PHP array entries
    pub casts: Vec<(String, String)>,
    /// JSON columns and their mutator names, e.g. `("meta", "setMetaAttribute")`
    pub json_mutators: Vec<(String, String)>,
    /// PHP array literal of sortable columns
    pub sortable_columns: String,
    /// PHP array literal of translatable columns
    pub translated_attributes: String,
    /// Blade layout the views extend
    pub layout: String,
    /// Index page size
    pub per_page: u32,
}

impl TemplateContext {
    /// Build the context for one table
    #[must_use]
    pub fn build(
        names: &NamingContext,
        columns: &Columns,
        options: &ContextOptions,
        rules: &dyn Inflections,
    ) -> Self {
        let record = format!("${}", names.model_variable_name);

        let fields: Vec<FieldContext> = columns
            .iter()
            .map(|column| {
                let relation = relation_of(column, names, options, rules);
                field_context(column, relation, names, &record)
            })
            .collect();

        let relations = fields.iter().filter_map(|f| f.relation.clone()).collect();

        let primary_key = columns
            .primary_key()
            .map_or_else(|| "id".to_string(), |c| c.name.clone());

        let heading_field = columns
            .iter()
            .find(|c| c.is_editable() && !c.is_foreign_key() && c.kind == ColumnKind::String)
            .map_or_else(|| primary_key.clone(), |c| c.name.clone());

        let casts = columns
            .iter()
            .filter_map(|c| match c.kind {
                ColumnKind::Boolean => Some((c.name.clone(), "boolean".to_string())),
                ColumnKind::Json => Some((c.name.clone(), "array".to_string())),
                _ => None,
            })
            .collect();

        let json_mutators = columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Json)
            .map(|c| (c.name.clone(), format!("set{}Attribute", c.name.to_pascal_case())))
            .collect();

        let routes = RouteNames {
            index: names.route_name("index"),
            create: names.route_name("create"),
            store: names.route_name("store"),
            show: names.route_name("show"),
            edit: names.route_name("edit"),
            update: names.route_name("update"),
            destroy: names.route_name("destroy"),
        };

        Self {
            names: names.clone(),
            sortable_columns: php_array(columns.iter().map(|c| c.name.as_str())),
            translated_attributes: php_array(
                columns
                    .iter()
                    .filter(|c| names.translatable_fields.contains(&c.name))
                    .map(|c| c.name.as_str()),
            ),
            fields,
            relations,
            routes,
            collection_variable: collection_variable(names),
            heading_field,
            primary_key,
            casts,
            json_mutators,
            layout: options.layout.clone(),
            per_page: options.per_page,
        }
    }
}

/// Index page collection variable; never the same as the record variable
fn collection_variable(names: &NamingContext) -> String {
    let plural = names.title_plural.to_camel_case();
    if plural == names.model_variable_name {
        format!("{plural}List")
    } else {
        plural
    }
}

fn relation_of(
    column: &ColumnDescriptor,
    names: &NamingContext,
    options: &ContextOptions,
    rules: &dyn Inflections,
) -> Option<RelationContext> {
    let fk = column.foreign_key.as_ref()?;
    let related = rules.singular_phrase(&fk.table);
    let stem = column
        .name
        .strip_suffix("_id")
        .filter(|s| !s.is_empty())
        .unwrap_or(related.as_str());
    let model_class = related.to_pascal_case();
    Some(RelationContext {
        method: stem.to_camel_case(),
        model_fqcn: format!("{}\\{model_class}", names.model_namespace),
        model_class,
        table: fk.table.clone(),
        column: fk.column.clone(),
        foreign_key: column.name.clone(),
        display_field: options.display_field.clone(),
    })
}

fn field_context(
    column: &ColumnDescriptor,
    relation: Option<RelationContext>,
    names: &NamingContext,
    record: &str,
) -> FieldContext {
    let name = &column.name;
    let editable = column.is_editable();
    let label = relation
        .as_ref()
        .map_or_else(|| name.to_title_case(), |r| r.method.to_title_case());

    let (create_input, edit_input, validation) = if editable {
        (
            Some(markup::form_input(column, relation.as_ref(), &format!("old('{name}')"))),
            Some(markup::form_input(
                column,
                relation.as_ref(),
                &markup::edit_value(column, record),
            )),
            Some(markup::validation_rules(column)),
        )
    } else {
        (None, None, None)
    };

    FieldContext {
        label,
        kind: column.kind.tag().to_string(),
        data_type: column.data_type.clone(),
        nullable: column.nullable,
        primary_key: column.primary_key,
        editable,
        translatable: names.translatable_fields.contains(name),
        fuzzy_search: relation.is_none() && column.kind.is_textual(),
        date_search: matches!(column.kind, ColumnKind::Date | ColumnKind::DateTime),
        search_input: markup::search_input(column, relation.as_ref()),
        cell: markup::table_cell(column, relation.as_ref(), record),
        create_input,
        edit_input,
        validation,
        relation,
        name: name.clone(),
    }
}

fn php_array<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|i| format!("'{i}'")).collect();
    format!("[{}]", quoted.join(", "))
}
