//! HTTP handlers of the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};

use bookshelf_http::{AppError, AppResult, Envelope, Reply};

use super::models::{AddedBook, BookDetail, BookFilter, BookList, BookPayload};
use super::store::{BookError, SharedStore};

/// The write or lookup a failure happened in; picks the client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Get,
    Update,
    Delete,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Add => "Failed to add book",
            Operation::Get => "Failed to get book",
            Operation::Update => "Failed to update book",
            Operation::Delete => "Failed to delete book",
        }
    }

    fn reject(self, err: BookError) -> AppError {
        let prefix = self.failure_prefix();
        match err {
            BookError::MissingName => {
                AppError::validation(format!("{prefix}. Please provide the book name"))
            }
            BookError::InvalidPageRange { .. } => AppError::validation(format!(
                "{prefix}. readPage must not be greater than pageCount"
            )),
            BookError::NotFound(_) if self == Operation::Get => {
                AppError::not_found("Book not found")
            }
            BookError::NotFound(_) => AppError::not_found(format!("{prefix}. Id not found")),
            BookError::InsertFailed(id) => {
                tracing::error!(book_id = %id, "book insert failed");
                AppError::internal(prefix)
            }
        }
    }
}

/// Unwrap a JSON body, reporting decode failures with the fail envelope.
fn payload(body: Result<Json<BookPayload>, JsonRejection>) -> AppResult<BookPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// Routes relative to the module mount point.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn add_book(
    State(store): State<SharedStore>,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Reply<AddedBook>> {
    let payload = payload(body)?;

    let book_id = store
        .write()
        .await
        .add(payload)
        .map_err(|err| Operation::Add.reject(err))?;

    tracing::info!(book_id = %book_id, "book added");
    Ok(Reply::created(
        Envelope::success(AddedBook { book_id }).with_message("Book added successfully"),
    ))
}

async fn list_books(
    State(store): State<SharedStore>,
    query: Result<Query<BookFilter>, QueryRejection>,
) -> AppResult<Reply<BookList>> {
    let Query(filter) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let books = store.read().await.list(&filter);
    tracing::debug!(count = books.len(), ?filter, "books listed");
    Ok(Reply::ok(Envelope::success(BookList { books })))
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> AppResult<Reply<BookDetail>> {
    let book = store
        .read()
        .await
        .get(&id)
        .cloned()
        .map_err(|err| Operation::Get.reject(err))?;

    Ok(Reply::ok(Envelope::success(BookDetail { book })))
}

async fn update_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Reply> {
    let payload = payload(body)?;

    store
        .write()
        .await
        .update(&id, payload)
        .map_err(|err| Operation::Update.reject(err))?;

    tracing::info!(book_id = %id, "book updated");
    Ok(Reply::ok(Envelope::message("Book updated successfully")))
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> AppResult<Reply> {
    store
        .write()
        .await
        .delete(&id)
        .map_err(|err| Operation::Delete.reject(err))?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(Reply::ok(Envelope::message("Book deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::modules::books::store::BookStore;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn add(app: &Router, body: Value) -> String {
        let (status, body) = send(app, Method::POST, "/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["bookId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn add_returns_created_with_generated_id() {
        let store = BookStore::shared();
        let app = router(store.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Dune", "pageCount": 412, "readPage": 12})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Book added successfully");
        let id = body["data"]["bookId"].as_str().unwrap();
        assert!(store.read().await.get(id).is_ok());
    }

    #[tokio::test]
    async fn add_without_name_is_bad_request() {
        let app = router(BookStore::shared());

        let (status, body) = send(&app, Method::POST, "/", Some(json!({"pageCount": 3}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "Failed to add book. Please provide the book name"
        );
    }

    #[tokio::test]
    async fn add_with_read_page_beyond_page_count_is_bad_request() {
        let app = router(BookStore::shared());

        let (status, body) = send(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Dune", "pageCount": 10, "readPage": 11})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Failed to add book. readPage must not be greater than pageCount"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = router(BookStore::shared());

        let (status, body) = send(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Dune", "pageCount": -1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn list_returns_summaries_filtered_by_name() {
        let app = router(BookStore::shared());
        add(&app, json!({"name": "Kisah Dicoding", "publisher": "Dicoding"})).await;
        add(&app, json!({"name": "Another Book", "publisher": "Elsewhere"})).await;

        let (status, body) = send(&app, Method::GET, "/?name=dICODING", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let books = body["data"]["books"].as_array().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["name"], "Kisah Dicoding");
        assert_eq!(books[0]["publisher"], "Dicoding");
        assert!(books[0]["id"].is_string());
        assert!(books[0].get("pageCount").is_none());
    }

    #[tokio::test]
    async fn list_filters_by_reading_and_finished() {
        let app = router(BookStore::shared());
        add(&app, json!({"name": "A", "pageCount": 5, "readPage": 5, "reading": true})).await;
        add(&app, json!({"name": "B", "pageCount": 5, "readPage": 1, "reading": true})).await;
        add(&app, json!({"name": "C", "pageCount": 5, "readPage": 5})).await;

        let (_, reading) = send(&app, Method::GET, "/?reading=1", None).await;
        let (_, unfinished) = send(&app, Method::GET, "/?finished=0", None).await;
        let (_, both) = send(&app, Method::GET, "/?reading=0&finished=1", None).await;

        assert_eq!(reading["data"]["books"].as_array().unwrap().len(), 2);
        assert_eq!(unfinished["data"]["books"][0]["name"], "B");
        assert_eq!(both["data"]["books"].as_array().unwrap().len(), 1);
        assert_eq!(both["data"]["books"][0]["name"], "C");
    }

    #[tokio::test]
    async fn malformed_query_is_bad_request_with_fail_envelope() {
        let app = router(BookStore::shared());

        let (status, body) = send(&app, Method::GET, "/?name=a&name=b", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert!(body["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn get_returns_full_record() {
        let app = router(BookStore::shared());
        let id = add(
            &app,
            json!({
                "name": "Dune",
                "year": 1965,
                "author": "Frank Herbert",
                "summary": "Spice",
                "publisher": "Chilton",
                "pageCount": 412,
                "readPage": 412,
                "reading": false
            }),
        )
        .await;

        let (status, body) = send(&app, Method::GET, &format!("/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        let book = &body["data"]["book"];
        assert_eq!(book["id"], id.as_str());
        assert_eq!(book["year"], 1965);
        assert_eq!(book["author"], "Frank Herbert");
        assert_eq!(book["finished"], true);
        assert_eq!(book["reading"], false);
        assert_eq!(book["insertedAt"], book["updatedAt"]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_for_get_update_delete() {
        let app = router(BookStore::shared());

        let (status, body) = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Book not found");

        let (status, body) = send(&app, Method::PUT, "/nope", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Failed to update book. Id not found");

        let (status, body) = send(&app, Method::DELETE, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Failed to delete book. Id not found");
    }

    #[tokio::test]
    async fn update_then_delete_round() {
        let app = router(BookStore::shared());
        let id = add(&app, json!({"name": "Draft", "pageCount": 10, "readPage": 2})).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/{id}"),
            Some(json!({"name": "Final", "pageCount": 10, "readPage": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Book updated successfully");

        let (_, body) = send(&app, Method::GET, &format!("/{id}"), None).await;
        assert_eq!(body["data"]["book"]["name"], "Final");
        assert_eq!(body["data"]["book"]["finished"], true);

        let (status, body) = send(&app, Method::DELETE, &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Book deleted successfully");

        let (status, _) = send(&app, Method::GET, &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_invalid_payload_is_bad_request() {
        let app = router(BookStore::shared());
        let id = add(&app, json!({"name": "Dune", "pageCount": 10})).await;

        let (status, body) = send(&app, Method::PUT, &format!("/{id}"), Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Failed to update book. Please provide the book name"
        );

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/{id}"),
            Some(json!({"name": "Dune", "pageCount": 1, "readPage": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Failed to update book. readPage must not be greater than pageCount"
        );
    }

    #[test]
    fn insert_failure_maps_to_internal_error() {
        let err = Operation::Add.reject(BookError::InsertFailed("dup".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to add book");
    }
}
