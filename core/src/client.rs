//! Request builders and response parsers for each endpoint.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Envelope, ServiceInfo, Todo, UpdateTodo};

/// Stateless client for the todo API; holds only the base URL.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/todo", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/todo/{id}", self.base_url)
    }

    pub fn build_home(&self) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Get, format!("{}/", self.base_url))
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Get, self.collection_url())
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.collection_url(), to_json(input)?))
    }

    pub fn build_update_todo(&self, id: &str, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Put, self.item_url(id), to_json(input)?))
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_home(&self, response: HttpResponse) -> Result<ServiceInfo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_data(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 201)
    }

    /// Returns the todo as it is after the update.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 200)
    }

    /// Returns the todo that was removed.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 200)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_data<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    let envelope: Envelope<T> = from_json(&response.body)?;
    Ok(envelope.data)
}

fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        s if s == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
