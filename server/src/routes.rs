//! Route table and middleware stack.

use std::time::Duration;

use axum::{
    body::HttpBody,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::handlers;
use crate::model::ErrorResponse;
use crate::store::SharedStore;

/// Upper bound on reading, handling and answering a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the application router around an already-connected store.
///
/// - `GET /` service info
/// - `GET /todo`, `POST /todo`
/// - `PUT /todo/{id}`, `DELETE /todo/{id}`
pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .nest("/todo", todo_routes())
        .fallback(handlers::not_found)
        .with_state(store)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        // Covers the 405s axum builds itself and the timeout's 408.
        .layer(middleware::map_response(json_error_body))
        // Outermost, so timed-out requests are logged too.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

fn todo_routes() -> Router<SharedStore> {
    Router::new()
        .route("/", get(handlers::fetch_todos).post(handlers::create_todo))
        .route("/{id}", put(handlers::update_todo).delete(handlers::delete_todo))
}

/// Gives bodiless error responses the same JSON shape handlers produce.
async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let bodiless = response.body().size_hint().exact() == Some(0)
        && !response.headers().contains_key(header::CONTENT_TYPE);
    if !bodiless || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let reason = status.canonical_reason().unwrap_or("Error");
    let body = ErrorResponse {
        message: reason.to_string(),
        error: reason.to_lowercase(),
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}
