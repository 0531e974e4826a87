pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use models::{Book, BookInput, NotFoundBody};
use store::SharedBookStore;

pub(crate) const BOOKS_MIGRATIONS: &[Migration] = &[Migration {
    id: "001_create_books",
    up: r#"
        CREATE TABLE books (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            title  TEXT NOT NULL CHECK (title <> ''),
            author TEXT NOT NULL CHECK (author <> '')
        );
        "#,
}];

/// Book catalogue: CRUD routes over an injected [`store::BookStore`].
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new(store: SharedBookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books ordered by id",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("Every book", json!({
                                "type": "array",
                                "items": schema_ref("Book")
                            })),
                            "500": error_response("Store failure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": request_body(),
                        "responses": {
                            "201": json_response("Created book", schema_ref("Book")),
                            "422": error_response("Invalid body"),
                            "500": error_response("Store failure")
                        }
                    }
                },
                "/{id}": {
                    "parameters": [id_parameter()],
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("The book", schema_ref("Book")),
                            "404": json_response("No book with this id", schema_ref("NotFoundBody")),
                            "422": error_response("Invalid id")
                        }
                    },
                    "put": {
                        "summary": "Replace a book's title and author",
                        "tags": ["Books"],
                        "requestBody": request_body(),
                        "responses": {
                            "200": json_response("Updated book", schema_ref("Book")),
                            "422": error_response("Invalid id or body"),
                            "500": error_response("Store failure, including an unknown id")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "422": error_response("Invalid id"),
                            "500": error_response("Store failure, including an unknown id")
                        }
                    }
                }
            },
            "components": { "schemas": component_schemas() }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        BOOKS_MIGRATIONS.to_vec()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Schemas generated from the model types, keyed by their schema names.
fn component_schemas() -> Map<String, Value> {
    let mut schemas = Map::new();
    insert_schema::<Book>(&mut schemas);
    insert_schema::<BookInput>(&mut schemas);
    insert_schema::<NotFoundBody>(&mut schemas);
    schemas
}

fn insert_schema<T: ToSchema>(schemas: &mut Map<String, Value>) {
    match serde_json::to_value(T::schema()) {
        Ok(schema) => {
            schemas.insert(T::name().into_owned(), schema);
        }
        Err(err) => tracing::warn!(schema = %T::name(), error = %err, "failed to render schema"),
    }
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> Value {
    json_response(description, schema_ref("ErrorResponse"))
}

fn request_body() -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema_ref("BookInput") } }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string", "pattern": "^[0-9]+$" }
    })
}

/// Create the books module over the given store
pub fn create_module(store: SharedBookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
