//! Typed client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the round-trip, so everything
//! here is deterministic and testable without a server.
//!
//! # Design
//! - `TodoClient` holds only `base_url`.
//! - Each operation is a `build_*` / `parse_*` pair; `parse_*` unwraps the
//!   server's `{"data": ...}` envelope.
//! - DTOs are defined independently from `todo-server`; the integration test
//!   runs both crates together to catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, ServiceInfo, Todo, UpdateTodo};
