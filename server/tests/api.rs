use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{self, Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use todo_server::model::{ObjectId, TodoChanges};
use todo_server::{app, MemoryStore, SharedStore, StoreError, Todo, TodoDocument, TodoStore};
use tower::ServiceExt;

const MISSING_ID: &str = "000000000000000000000000";

fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

async fn send(store: &SharedStore, request: Request<String>) -> axum::response::Response {
    app(store.clone()).oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

async fn create(store: &SharedStore, title: &str) -> Todo {
    let body = serde_json::json!({ "title": title }).to_string();
    let resp = send(store, json_request("POST", "/todo", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    serde_json::from_value(body_json(resp).await["data"].clone()).unwrap()
}

async fn list(store: &SharedStore) -> Vec<Todo> {
    let resp = send(store, empty_request("GET", "/todo")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_value(body_json(resp).await["data"].clone()).unwrap()
}

/// Every call fails as if the store had gone away mid-flight.
struct FailingStore;

#[async_trait]
impl TodoStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<TodoDocument>, StoreError> {
        Err(StoreError::Operation("connection reset".to_string()))
    }

    async fn insert_one(&self, _todo: &TodoDocument) -> Result<(), StoreError> {
        Err(StoreError::Operation("connection reset".to_string()))
    }

    async fn update_by_id(
        &self,
        _id: ObjectId,
        _changes: TodoChanges,
    ) -> Result<Option<TodoDocument>, StoreError> {
        Err(StoreError::Operation("connection reset".to_string()))
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<Option<TodoDocument>, StoreError> {
        Err(StoreError::Operation("connection reset".to_string()))
    }
}

/// Every call waits forever, like a store that stopped answering.
struct StalledStore;

#[async_trait]
impl TodoStore for StalledStore {
    async fn find_all(&self) -> Result<Vec<TodoDocument>, StoreError> {
        std::future::pending().await
    }

    async fn insert_one(&self, _todo: &TodoDocument) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn update_by_id(
        &self,
        _id: ObjectId,
        _changes: TodoChanges,
    ) -> Result<Option<TodoDocument>, StoreError> {
        std::future::pending().await
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<Option<TodoDocument>, StoreError> {
        std::future::pending().await
    }
}

// --- home ---

#[tokio::test]
async fn home_reports_service_info() {
    let resp = send(&memory_store(), empty_request("GET", "/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "todo-server");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404_with_json_body() {
    let resp = send(&memory_store(), empty_request("GET", "/nope")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn unsupported_method_is_405_with_json_body() {
    let store = memory_store();
    let resp = send(&store, json_request("PATCH", "/todo", r#"{"title":"x"}"#)).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Method Not Allowed");

    let resp = send(&store, empty_request("GET", &format!("/todo/{MISSING_ID}"))).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(resp.headers().contains_key(http::header::ALLOW));
    assert_eq!(body_json(resp).await["message"], "Method Not Allowed");
}

#[tokio::test(start_paused = true)]
async fn stalled_request_times_out_with_json_body() {
    let store: SharedStore = Arc::new(StalledStore);
    let resp = send(&store, empty_request("GET", "/todo")).await;
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Request Timeout");
}

// --- fetch ---

#[tokio::test]
async fn fetch_empty_collection() {
    let resp = send(&memory_store(), empty_request("GET", "/todo")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "data": [] }));
}

#[tokio::test]
async fn fetch_failure_is_500() {
    let store: SharedStore = Arc::new(FailingStore);
    let resp = send(&store, empty_request("GET", "/todo")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Failed to fetch todo");
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

// --- create ---

#[tokio::test]
async fn create_returns_201_and_shows_up_in_fetch() {
    let store = memory_store();
    let before = Utc::now().timestamp_millis();
    let created = create(&store, "Buy milk").await;
    let after = Utc::now().timestamp_millis();

    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert_eq!(created.id.len(), 24);

    let todos = list(&store).await;
    assert_eq!(todos.len(), 1);
    let fetched = &todos[0];
    assert_eq!(fetched, &created);
    let created_at = fetched.created_at.timestamp_millis();
    assert!(before <= created_at && created_at <= after);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
    let store = memory_store();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(create(&store, &format!("todo {i}")).await.id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[tokio::test]
async fn create_with_completed_true() {
    let store = memory_store();
    let resp = send(
        &store,
        json_request("POST", "/todo", r#"{"title":"Already done","completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["completed"], true);
}

#[tokio::test]
async fn create_without_title_is_400_and_persists_nothing() {
    let store = memory_store();
    for body in [r#"{}"#, r#"{"title":""}"#, r#"{"title":"  "}"#, r#"{"completed":true}"#] {
        let resp = send(&store, json_request("POST", "/todo", body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Invalid request");
    }
    assert!(list(&store).await.is_empty());
}

#[tokio::test]
async fn create_malformed_json_is_400() {
    let store = memory_store();
    let resp = send(&store, json_request("POST", "/todo", r#"{"title":"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&store, json_request("POST", "/todo", r#"{"title":42}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_without_content_type_is_400() {
    let resp = send(
        &memory_store(),
        Request::builder()
            .method("POST")
            .uri("/todo")
            .body(r#"{"title":"x"}"#.to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_failure_is_500() {
    let store: SharedStore = Arc::new(FailingStore);
    let resp = send(&store, json_request("POST", "/todo", r#"{"title":"x"}"#)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["message"], "Failed to create todo");
}

// --- update ---

#[tokio::test]
async fn update_completed_leaves_title_and_created_at() {
    let store = memory_store();
    let created = create(&store, "Walk dog").await;

    let resp = send(
        &store,
        json_request("PUT", &format!("/todo/{}", created.id), r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = serde_json::from_value(body_json(resp).await["data"].clone()).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_title_only() {
    let store = memory_store();
    let created = create(&store, "Walk dog").await;

    let resp = send(
        &store,
        json_request("PUT", &format!("/todo/{}", created.id), r#"{"title":"Walk cat"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let todos = list(&store).await;
    assert_eq!(todos[0].title, "Walk cat");
    assert!(!todos[0].completed);
}

#[tokio::test]
async fn update_malformed_id_is_400() {
    let resp = send(
        &memory_store(),
        json_request("PUT", "/todo/not-an-id", r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_non_utf8_id_is_400_with_json_body() {
    let resp = send(
        &memory_store(),
        json_request("PUT", "/todo/%FF", r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Invalid request");
}

#[tokio::test]
async fn update_missing_is_404() {
    let resp = send(
        &memory_store(),
        json_request("PUT", &format!("/todo/{MISSING_ID}"), r#"{"title":"Nope"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Todo not found");
}

#[tokio::test]
async fn update_with_empty_body_is_400() {
    let store = memory_store();
    let created = create(&store, "Walk dog").await;
    let resp = send(&store, json_request("PUT", &format!("/todo/{}", created.id), "{}")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_failure_is_500() {
    let store: SharedStore = Arc::new(FailingStore);
    let resp = send(
        &store,
        json_request("PUT", &format!("/todo/{MISSING_ID}"), r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["message"], "Failed to update todo");
}

// --- delete ---

#[tokio::test]
async fn delete_twice_is_200_then_404() {
    let store = memory_store();
    let created = create(&store, "Gone soon").await;
    let uri = format!("/todo/{}", created.id);

    let resp = send(&store, empty_request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["id"], created.id.as_str());
    assert!(list(&store).await.is_empty());

    let resp = send(&store, empty_request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_malformed_id_is_400() {
    let resp = send(&memory_store(), empty_request("DELETE", "/todo/xyz")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_non_utf8_id_is_400_with_json_body() {
    let resp = send(&memory_store(), empty_request("DELETE", "/todo/%FF")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(body_json(resp).await["message"], "Invalid request");
}

#[tokio::test]
async fn delete_failure_is_500() {
    let store: SharedStore = Arc::new(FailingStore);
    let resp = send(&store, empty_request("DELETE", &format!("/todo/{MISSING_ID}"))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let store = memory_store();

    let created = create(&store, "Write spec").await;
    let id = created.id.clone();

    let todos = list(&store).await;
    assert!(todos.iter().any(|t| t.id == id && !t.completed));

    let resp = send(
        &store,
        json_request("PUT", &format!("/todo/{id}"), r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let todos = list(&store).await;
    assert!(todos.iter().any(|t| t.id == id && t.completed));

    let resp = send(&store, empty_request("DELETE", &format!("/todo/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let todos = list(&store).await;
    assert!(todos.iter().all(|t| t.id != id));

    let resp = send(&store, empty_request("DELETE", &format!("/todo/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
