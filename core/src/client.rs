//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the API root and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`;
//! the transport executes the round-trip in between. The session token is a
//! per-call parameter rather than a field, so a login or logout takes effect
//! on the very next request without rebuilding anything.

use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoFilter, UpdateTodo};

/// Synchronous, stateless builder and parser for the todo REST contract.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. [`TodosApi`](crate::api::TodosApi) wires this to a
/// transport and a session store.
#[derive(Debug, Clone)]
pub struct TodoClient {
    api_root: String,
}

impl TodoClient {
    pub fn new(api_root: &str) -> Self {
        Self {
            api_root: api_root.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, token: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/todos", self.api_root),
            headers: auth_headers(token),
            body: None,
        }
    }

    pub fn build_list_todos_filtered(
        &self,
        filter: TodoFilter,
        token: Option<&str>,
    ) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/todos/{}", self.api_root, filter.path_segment()),
            headers: auth_headers(token),
            body: None,
        }
    }

    pub fn build_get_todo(&self, id: i64, token: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/todos/{id}", self.api_root),
            headers: auth_headers(token),
            body: None,
        }
    }

    pub fn build_create_todo(
        &self,
        input: &CreateTodo,
        token: Option<&str>,
    ) -> Result<HttpRequest, Error> {
        let body = serde_json::to_string(input).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/todos", self.api_root),
            headers: json_headers(token),
            body: Some(body),
        })
    }

    pub fn build_update_todo(
        &self,
        id: i64,
        input: &UpdateTodo,
        token: Option<&str>,
    ) -> Result<HttpRequest, Error> {
        let body = serde_json::to_string(input).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/todos/{id}", self.api_root),
            headers: json_headers(token),
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: i64, token: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/todos/{id}", self.api_root),
            headers: auth_headers(token),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, Error> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, Error> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, Error> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, Error> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), Error> {
        check_status(&response, 204)?;
        Ok(())
    }
}

fn auth_headers(token: Option<&str>) -> Vec<(String, String)> {
    match token {
        Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
        None => Vec::new(),
    }
}

fn json_headers(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = auth_headers(token);
    headers.push(("content-type".to_string(), "application/json".to_string()));
    headers
}

/// Map non-success status codes to the appropriate `Error` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), Error> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        404 => Err(Error::NotFound),
        401 => Err(Error::Unauthorized),
        status => Err(Error::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
