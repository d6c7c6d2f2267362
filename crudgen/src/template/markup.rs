//! Per-column Blade markup and validation rules
//!
//! | kind            | form input                  | search input       | cell              |
//! |-----------------|-----------------------------|--------------------|-------------------|
//! | foreign key     | select over related model   | select, any option | related display   |
//! | boolean         | hidden `0` + checkbox `1`   | any / yes / no     | Yes / No          |
//! | text            | textarea                    | text               | first 50 chars    |
//! | json            | text, JSON-encoded          | text               | JSON-encoded      |
//! | integer         | number                      | text               | value             |
//! | decimal, float  | number, `step="any"`        | text               | value             |
//! | date            | date                        | date               | value             |
//! | datetime        | datetime-local              | date               | value             |
//! | time            | time                        | text               | value             |
//! | anything else   | text                        | text               | value             |
//!
//! Primary keys and timestamp columns get no form input.

use super::context::RelationContext;
use crate::metadata::{ColumnDescriptor, ColumnKind};

/// Form control for a create or edit form; `value` is a Blade expression
pub(crate) fn form_input(column: &ColumnDescriptor, relation: Option<&RelationContext>, value: &str) -> String {
    let name = &column.name;

    if let Some(relation) = relation {
        return format!(
            "<select class=\"form-control\" id=\"{name}\" name=\"{name}\">\n    \
             <option value=\"\"></option>\n    \
             @foreach (\\{model}::all() as $option)\n    \
             <option value=\"{{{{ $option->{key} }}}}\" {{{{ (string) {value} === (string) $option->{key} ? 'selected' : '' }}}}>{{{{ $option->{display} }}}}</option>\n    \
             @endforeach\n\
             </select>",
            model = relation.model_fqcn,
            key = relation.column,
            display = relation.display_field,
        );
    }

    match column.kind {
        ColumnKind::Boolean => format!(
            "<input type=\"hidden\" name=\"{name}\" value=\"0\">\n\
             <input type=\"checkbox\" class=\"form-check-input\" id=\"{name}\" name=\"{name}\" value=\"1\" {{{{ {value} ? 'checked' : '' }}}}>"
        ),
        ColumnKind::Text => format!(
            "<textarea class=\"form-control\" id=\"{name}\" name=\"{name}\" rows=\"5\">{{{{ {value} }}}}</textarea>"
        ),
        ColumnKind::Integer => input("number", name, value, ""),
        ColumnKind::Decimal | ColumnKind::Float => input("number", name, value, " step=\"any\""),
        ColumnKind::Date => input("date", name, value, ""),
        ColumnKind::DateTime => input("datetime-local", name, value, ""),
        ColumnKind::Time => input("time", name, value, ""),
        ColumnKind::String | ColumnKind::Json | ColumnKind::Other => input("text", name, value, ""),
    }
}

/// Edit form value: the old input, else the stored value in the form's format
pub(crate) fn edit_value(column: &ColumnDescriptor, record: &str) -> String {
    let name = &column.name;
    let stored = format!("{record}->{name}");
    if column.is_foreign_key() {
        return format!("old('{name}', {stored})");
    }
    match column.kind {
        ColumnKind::Json => format!("old('{name}', {stored} === null ? '' : json_encode({stored}))"),
        ColumnKind::DateTime => {
            format!("old('{name}', {stored} ? date('Y-m-d\\TH:i', strtotime({stored})) : '')")
        }
        _ => format!("old('{name}', {stored})"),
    }
}

/// Search control for the index view, pre-filled from the request
pub(crate) fn search_input(column: &ColumnDescriptor, relation: Option<&RelationContext>) -> String {
    let name = &column.name;
    let value = format!("Request::input('{name}')");

    if let Some(relation) = relation {
        return format!(
            "<select class=\"form-control\" id=\"search-{name}\" name=\"{name}\">\n    \
             <option value=\"\">Any</option>\n    \
             @foreach (\\{model}::all() as $option)\n    \
             <option value=\"{{{{ $option->{key} }}}}\" {{{{ (string) {value} === (string) $option->{key} ? 'selected' : '' }}}}>{{{{ $option->{display} }}}}</option>\n    \
             @endforeach\n\
             </select>",
            model = relation.model_fqcn,
            key = relation.column,
            display = relation.display_field,
        );
    }

    match column.kind {
        ColumnKind::Boolean => format!(
            "<select class=\"form-control\" id=\"search-{name}\" name=\"{name}\">\n    \
             <option value=\"\">Any</option>\n    \
             <option value=\"1\" {{{{ {value} === '1' ? 'selected' : '' }}}}>Yes</option>\n    \
             <option value=\"0\" {{{{ {value} === '0' ? 'selected' : '' }}}}>No</option>\n\
             </select>"
        ),
        ColumnKind::Date | ColumnKind::DateTime => search("date", name, &value),
        _ => search("text", name, &value),
    }
}

/// Display of a column value; `record` is the Blade variable holding the row
pub(crate) fn table_cell(column: &ColumnDescriptor, relation: Option<&RelationContext>, record: &str) -> String {
    let name = &column.name;
    if let Some(relation) = relation {
        let method = &relation.method;
        return format!(
            "{{{{ {record}->{method} ? {record}->{method}->{display} : '' }}}}",
            display = relation.display_field
        );
    }
    match column.kind {
        ColumnKind::Boolean => format!("{{{{ {record}->{name} ? 'Yes' : 'No' }}}}"),
        ColumnKind::Text => format!("{{{{ str_limit({record}->{name}, 50) }}}}"),
        ColumnKind::Json => format!("{{{{ json_encode({record}->{name}) }}}}"),
        _ => format!("{{{{ {record}->{name} }}}}"),
    }
}

/// Laravel validation rules for an editable column
pub(crate) fn validation_rules(column: &ColumnDescriptor) -> String {
    let presence = if column.nullable { "nullable" } else { "required" };
    let rules = match (&column.foreign_key, column.kind) {
        (Some(fk), _) => format!("integer|exists:{},{}", fk.table, fk.column),
        (None, ColumnKind::Integer) => "integer".to_string(),
        (None, ColumnKind::Decimal | ColumnKind::Float) => "numeric".to_string(),
        (None, ColumnKind::Boolean) => "boolean".to_string(),
        (None, ColumnKind::Date | ColumnKind::DateTime) => "date".to_string(),
        (None, ColumnKind::String | ColumnKind::Other) => "string|max:255".to_string(),
        (None, ColumnKind::Json) => "json".to_string(),
        (None, ColumnKind::Text | ColumnKind::Time) => "string".to_string(),
    };
    format!("{presence}|{rules}")
}

fn input(kind: &str, name: &str, value: &str, extra: &str) -> String {
    format!(
        "<input type=\"{kind}\" class=\"form-control\" id=\"{name}\" name=\"{name}\"{extra} value=\"{{{{ {value} }}}}\">"
    )
}

fn search(kind: &str, name: &str, value: &str) -> String {
    format!(
        "<input type=\"{kind}\" class=\"form-control\" id=\"search-{name}\" name=\"{name}\" value=\"{{{{ {value} }}}}\">"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> RelationContext {
        RelationContext {
            method: "category".to_string(),
            model_class: "Category".to_string(),
            model_fqcn: "App\\Category".to_string(),
            table: "categories".to_string(),
            column: "id".to_string(),
            foreign_key: "category_id".to_string(),
            display_field: "name".to_string(),
        }
    }

    #[test]
    fn test_text_input() {
        let column = ColumnDescriptor::new("title", "varchar(255)");
        assert_eq!(
            form_input(&column, None, "old('title')"),
            "<input type=\"text\" class=\"form-control\" id=\"title\" name=\"title\" value=\"{{ old('title') }}\">"
        );
    }

    #[test]
    fn test_decimal_input_accepts_any_step() {
        let column = ColumnDescriptor::new("price", "decimal(8,2)");
        let markup = form_input(&column, None, "old('price')");
        assert!(markup.contains("type=\"number\""));
        assert!(markup.contains("step=\"any\""));
    }

    #[test]
    fn test_boolean_markup() {
        let column = ColumnDescriptor::new("published", "boolean");
        let form = form_input(&column, None, "old('published')");
        assert!(form.starts_with("<input type=\"hidden\" name=\"published\" value=\"0\">\n"));
        assert!(form.contains("type=\"checkbox\""));

        let search = search_input(&column, None);
        assert!(search.contains(">Any</option>"));
        assert!(search.contains(">Yes</option>"));
        assert!(search.contains(">No</option>"));

        assert_eq!(
            table_cell(&column, None, "$post"),
            "{{ $post->published ? 'Yes' : 'No' }}"
        );
    }

    #[test]
    fn test_foreign_key_markup() {
        let column = ColumnDescriptor::new("category_id", "integer").references("categories", "id");
        let relation = category();

        let form = form_input(&column, Some(&relation), "old('category_id')");
        assert!(form.starts_with("<select class=\"form-control\" id=\"category_id\" name=\"category_id\">"));
        assert!(form.contains("@foreach (\\App\\Category::all() as $option)"));
        assert!(form.contains("{{ $option->name }}"));

        assert_eq!(
            table_cell(&column, Some(&relation), "$post"),
            "{{ $post->category ? $post->category->name : '' }}"
        );
    }

    #[test]
    fn test_date_search_and_textarea() {
        let created = ColumnDescriptor::new("published_at", "datetime");
        assert!(form_input(&created, None, "x").contains("type=\"datetime-local\""));
        assert!(search_input(&created, None).contains("type=\"date\""));

        let body = ColumnDescriptor::new("body", "text");
        assert!(form_input(&body, None, "x").starts_with("<textarea"));
        assert_eq!(table_cell(&body, None, "$post"), "{{ str_limit($post->body, 50) }}");
    }

    #[test]
    fn test_json_markup() {
        let column = ColumnDescriptor::new("meta", "json").nullable(true);

        let form = form_input(&column, None, &edit_value(&column, "$post"));
        assert_eq!(
            form,
            "<input type=\"text\" class=\"form-control\" id=\"meta\" name=\"meta\" \
             value=\"{{ old('meta', $post->meta === null ? '' : json_encode($post->meta)) }}\">"
        );
        assert_eq!(table_cell(&column, None, "$post"), "{{ json_encode($post->meta) }}");
        assert_eq!(validation_rules(&column), "nullable|json");
    }

    #[test]
    fn test_datetime_edit_value_uses_input_format() {
        let column = ColumnDescriptor::new("published_at", "datetime");
        let form = form_input(&column, None, &edit_value(&column, "$post"));
        assert!(form.contains(
            "value=\"{{ old('published_at', $post->published_at ? date('Y-m-d\\TH:i', strtotime($post->published_at)) : '') }}\""
        ));

        let title = ColumnDescriptor::new("title", "varchar(255)");
        assert_eq!(edit_value(&title, "$post"), "old('title', $post->title)");

        let category = ColumnDescriptor::new("category_id", "integer").references("categories", "id");
        assert_eq!(edit_value(&category, "$post"), "old('category_id', $post->category_id)");
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(
            validation_rules(&ColumnDescriptor::new("title", "varchar(255)")),
            "required|string|max:255"
        );
        assert_eq!(
            validation_rules(&ColumnDescriptor::new("views", "integer").nullable(true)),
            "nullable|integer"
        );
        assert_eq!(
            validation_rules(&ColumnDescriptor::new("category_id", "integer").references("categories", "id")),
            "required|integer|exists:categories,id"
        );
        assert_eq!(
            validation_rules(&ColumnDescriptor::new("published_on", "date")),
            "required|date"
        );
    }
}
