use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /todos`. Everything is optional at the serde level so a
/// missing title surfaces as a validation message rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewTodoRequest {
    #[schema(max_length = 100)]
    pub title: Option<String>,
    #[schema(max_length = 500)]
    pub description: Option<String>,
    pub completed: Option<bool>,
    /// ISO-8601 timestamp or date.
    pub due_date: Option<String>,
}

/// Body of `PUT /todos/{id}`.
///
/// The outer `Option` records whether a key was sent at all, the inner one
/// whether it was `null`. Only keys that were sent are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, max_length = 100)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, max_length = 500)]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    /// ISO-8601 timestamp or date; `null` or `""` clears it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated insert.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// A validated set of field changes.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl NewTodoRequest {
    pub fn validate(self) -> Result<NewTodo, AppError> {
        let title = match self.title {
            Some(title) => validate_title(title)?,
            None => return Err(AppError::BadRequest("Title is required".to_string())),
        };
        let description = self.description.map(validate_description).transpose()?;
        let due_date = match self.due_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_due_date(raw)?),
        };

        Ok(NewTodo {
            title,
            description,
            completed: self.completed.unwrap_or(false),
            due_date,
        })
    }
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoChanges, AppError> {
        let title = match self.title {
            None => None,
            Some(Some(title)) => Some(validate_title(title)?),
            Some(None) => return Err(AppError::BadRequest("Title must not be empty".to_string())),
        };
        let description = match self.description {
            None => None,
            Some(description) => Some(description.map(validate_description).transpose()?),
        };
        let due_date = match self.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) if raw.is_empty() => Some(None),
            Some(Some(raw)) => Some(Some(parse_due_date(&raw)?)),
        };

        Ok(TodoChanges {
            title,
            description,
            completed: self.completed,
            due_date,
        })
    }
}

fn validate_title(title: String) -> Result<String, AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::BadRequest(format!(
            "Title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(title)
}

fn validate_description(description: String) -> Result<String, AppError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(AppError::BadRequest(format!(
            "Description must be at most {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }
    Ok(description)
}

fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_timestamp(raw).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid due_date '{}': expected an ISO-8601 timestamp", raw))
    })
}

/// Parses an ISO-8601 timestamp. Values without an offset are taken as UTC,
/// a bare date as midnight UTC. Precision is cut to microseconds, which is
/// what survives a round trip through the store.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    let parsed = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        Some(dt.with_timezone(&Utc))
    } else if let Some(naive) = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        Some(naive.and_utc())
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    };

    parsed.map(|dt| dt.trunc_subsecs(6))
}
