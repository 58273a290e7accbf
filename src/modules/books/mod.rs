pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::{BookStore, SharedStore};

/// Books module: the in-memory bookshelf and its CRUD endpoints
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Handle to the store backing this module's routes
    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new(BookStore::shared())
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.read().await.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "description": "Case-insensitive substring of the book name",
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "reading",
                                "in": "query",
                                "required": false,
                                "description": "1 for books being read, 0 for the others",
                                "schema": { "type": "string", "enum": ["0", "1"] }
                            },
                            {
                                "name": "finished",
                                "in": "query",
                                "required": false,
                                "description": "1 for finished books, 0 for the others",
                                "schema": { "type": "string", "enum": ["0", "1"] }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Summaries of the matching books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookListResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book added",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AddedBookResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing name, readPage greater than pageCount, or malformed body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Book could not be inserted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }
                    ],
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Full book record",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookDetailResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Book updated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing name, readPage greater than pageCount, or malformed body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Book deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Generated identifier" },
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "finished": { "type": "boolean", "description": "pageCount equals readPage" },
                            "reading": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "name", "year", "author", "summary", "publisher",
                            "pageCount", "readPage", "finished", "reading",
                            "insertedAt", "updatedAt"
                        ]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Required, non-empty" },
                            "year": { "type": "integer", "default": 0 },
                            "author": { "type": "string", "default": "" },
                            "summary": { "type": "string", "default": "" },
                            "publisher": { "type": "string", "default": "" },
                            "pageCount": { "type": "integer", "minimum": 0, "default": 0 },
                            "readPage": { "type": "integer", "minimum": 0, "default": 0 },
                            "reading": { "type": "boolean", "default": false }
                        },
                        "required": ["name"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "publisher": { "type": "string" }
                        },
                        "required": ["id", "name", "publisher"]
                    },
                    "AddedBookResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" },
                            "data": {
                                "type": "object",
                                "properties": { "bookId": { "type": "string" } },
                                "required": ["bookId"]
                            }
                        },
                        "required": ["status", "message", "data"]
                    },
                    "BookListResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "data": {
                                "type": "object",
                                "properties": {
                                    "books": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BookSummary" }
                                    }
                                },
                                "required": ["books"]
                            }
                        },
                        "required": ["status", "data"]
                    },
                    "BookDetailResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "data": {
                                "type": "object",
                                "properties": {
                                    "book": { "$ref": "#/components/schemas/Book" }
                                },
                                "required": ["book"]
                            }
                        },
                        "required": ["status", "data"]
                    },
                    "MessageResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" }
                        },
                        "required": ["status", "message"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.store.read().await.len();
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped, in-memory records discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the books module with an empty store
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::BookPayload;

    #[tokio::test]
    async fn routes_share_the_module_store() {
        let module = BooksModule::default();
        let _router = module.routes();

        module
            .store()
            .write()
            .await
            .add(BookPayload {
                name: Some("Shared".to_string()),
                ..BookPayload::default()
            })
            .unwrap();

        assert_eq!(module.store().read().await.len(), 1);
        assert_eq!(module.name(), "books");
        assert!(module.openapi().unwrap()["paths"]["/{id}"]["put"].is_object());
    }
}
