//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently of
//! the mock-server crate; integration tests catch any drift between the two.
//! The payload limits match the server's validation rules so mutation
//! coordinators can reject bad input before a request is ever built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Longest accepted title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Longest accepted description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A single todo item returned by the API.
///
/// `id`, `created_at` and `updated_at` are server-assigned. The client never
/// fabricates them, not even for an optimistic patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTodo {
    /// Reject payloads the server would refuse with a 422, before any
    /// request is built.
    pub fn validate(&self) -> Result<(), Error> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// Reject payloads the server would refuse with a 422, before any
    /// request is built.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())
    }

    /// Merge the present fields into `todo`, leaving server-owned fields
    /// untouched.
    pub(crate) fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

fn validate_title(title: &str) -> Result<(), Error> {
    if title.is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::Validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), Error> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_CHARS => Err(Error::Validation(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        ))),
        _ => Ok(()),
    }
}

/// Profile of the signed-in user, as issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Server-side list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoFilter {
    /// Only items with `completed == true`.
    Completed,
    /// Only items with `completed == false`.
    Active,
}

impl TodoFilter {
    /// Path segment appended to `/todos`.
    pub(crate) fn path_segment(self) -> &'static str {
        match self {
            TodoFilter::Completed => "completed",
            TodoFilter::Active => "active",
        }
    }
}
