//! HTTP CRUD service for a single collection of todo items.
//!
//! # Overview
//! `GET /` answers with service info; `/todo` exposes list, create, update
//! and delete over a document store. Request flow is router -> handler ->
//! store -> record mapper -> JSON response.
//!
//! # Design
//! - The store is connected once at startup and injected into the router as
//!   `SharedStore`; there is no global state.
//! - Storage records (`TodoDocument`) and wire records (`Todo`) are separate
//!   types; handlers only ever serialize the wire form.
//! - Every per-request failure is an `ApiError` rendered as a JSON
//!   `{"message", "error"}` body. Only startup failures end the process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{ApiError, Error};
pub use model::{Todo, TodoDocument};
pub use routes::app;
pub use server::Server;
pub use store::{MemoryStore, MongoStore, SharedStore, StoreError, TodoStore};
