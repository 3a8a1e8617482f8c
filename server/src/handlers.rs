//! Request handlers for the todo resource.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{StatusCode, Uri},
    Json,
};
use tracing::debug;

use crate::error::ApiError;
use crate::model::{
    parse_id, CreateTodo, DataResponse, ErrorResponse, ServiceInfo, Todo, UpdateTodo,
};
use crate::store::SharedStore;

pub async fn home() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

pub async fn fetch_todos(
    State(store): State<SharedStore>,
) -> Result<Json<DataResponse<Vec<Todo>>>, ApiError> {
    let todos = store
        .find_all()
        .await
        .map_err(|e| ApiError::store("Failed to fetch todo", e))?;
    Ok(Json(DataResponse::new(todos.into_iter().map(Todo::from).collect())))
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Todo>>), ApiError> {
    let Json(input) = payload?;
    let todo = input.into_document()?;
    store
        .insert_one(&todo)
        .await
        .map_err(|e| ApiError::store("Failed to create todo", e))?;
    debug!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(todo.into()))))
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<DataResponse<Todo>>, ApiError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let changes = input.into_changes()?;
    let todo = store
        .update_by_id(id, changes)
        .await
        .map_err(|e| ApiError::store("Failed to update todo", e))?
        .ok_or(ApiError::NotFound)?;
    debug!(%id, "todo updated");
    Ok(Json(DataResponse::new(todo.into())))
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<Todo>>, ApiError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let todo = store
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::store("Failed to delete todo", e))?
        .ok_or(ApiError::NotFound)?;
    debug!(%id, "todo deleted");
    Ok(Json(DataResponse::new(todo.into())))
}

/// Fallback for paths no route matches.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse {
        message: "Route not found".to_string(),
        error: format!("no route for {}", uri.path()),
    };
    (StatusCode::NOT_FOUND, Json(body))
}
