//! Introspection and scaffolding against a real SQLite database

use crudgen::config::ScaffoldConfig;
use crudgen::metadata::{ColumnKind, MetadataError, MetadataSource};
use crudgen_cli_lib::commands::ScaffoldCommand;
use crudgen_cli_lib::{DatabaseBackend, DatabaseMetadata};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &[&str] = &[
    "CREATE TABLE categories (
        id INTEGER PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )",
    "CREATE TABLE blog_posts (
        id INTEGER PRIMARY KEY,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        title VARCHAR(255) NOT NULL,
        body TEXT,
        published TINYINT(1) NOT NULL DEFAULT 0,
        created_at TIMESTAMP,
        updated_at TIMESTAMP
    )",
];

/// Create a database file with the test schema and return its URL
fn database(dir: &Path) -> String {
    let url = format!("sqlite://{}?mode=rwc", dir.join("app.sqlite").display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let pool = sqlx::SqlitePool::connect(&url).await.unwrap();
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool.close().await;
    });

    url
}

#[test]
fn test_reads_columns_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let metadata = DatabaseMetadata::connect(&database(dir.path())).unwrap();
    assert_eq!(metadata.backend(), DatabaseBackend::Sqlite);

    let columns = metadata.fields("blog_posts").unwrap();

    assert_eq!(
        columns.names(),
        vec!["id", "category_id", "title", "body", "published", "created_at", "updated_at"]
    );

    let id = columns.get("id").unwrap();
    assert!(id.primary_key);
    assert_eq!(id.kind, ColumnKind::Integer);

    let title = columns.get("title").unwrap();
    assert_eq!(title.kind, ColumnKind::String);
    assert!(!title.nullable);

    let body = columns.get("body").unwrap();
    assert_eq!(body.kind, ColumnKind::Text);
    assert!(body.nullable);

    assert_eq!(columns.get("published").unwrap().kind, ColumnKind::Boolean);
    assert_eq!(columns.get("created_at").unwrap().kind, ColumnKind::DateTime);
}

#[test]
fn test_reads_declared_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let metadata = DatabaseMetadata::connect(&database(dir.path())).unwrap();

    let columns = metadata.fields("blog_posts").unwrap();
    let foreign_key = columns.get("category_id").unwrap().foreign_key.clone().unwrap();

    assert_eq!(foreign_key.table, "categories");
    assert_eq!(foreign_key.column, "id");
    assert!(columns.get("title").unwrap().foreign_key.is_none());
}

#[test]
fn test_table_existence() {
    let dir = TempDir::new().unwrap();
    let metadata = DatabaseMetadata::connect(&database(dir.path())).unwrap();

    assert!(metadata.table_exists("categories").unwrap());
    assert!(!metadata.table_exists("post_translations").unwrap());
    assert!(matches!(
        metadata.fields("missing"),
        Err(MetadataError::TableNotFound { table }) if table == "missing"
    ));
}

#[test]
fn test_scaffold_command_from_database() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let url = database(root);
    fs::create_dir_all(root.join("app/Http")).unwrap();
    fs::write(
        root.join("app/Http/routes.php"),
        "<?php\n\nRoute::group(['middleware' => ['web']], function () {\n    // crud routes go here\n});\n",
    )
    .unwrap();

    let command = ScaffoldCommand {
        table: "blog_posts".to_string(),
        route_base: Some("Admin".to_string()),
        database_url: Some(url),
        no_interaction: true,
        ..ScaffoldCommand::default()
    };
    command.execute(root, ScaffoldConfig::default()).unwrap();

    let model = fs::read_to_string(root.join("app/BlogPost.php")).unwrap();
    assert!(model.contains("class BlogPost extends Model"));
    assert!(model.contains("public function category()"));
    assert!(root
        .join("app/Http/Controllers/Admin/BlogPostController.php")
        .is_file());
    assert!(root
        .join("resources/views/admin/blog_post/edit.blade.php")
        .is_file());

    let routes = fs::read_to_string(root.join("app/Http/routes.php")).unwrap();
    assert!(routes.contains("    Route::resource('admin/blog-post', 'Admin\\BlogPostController');\n"));
}
