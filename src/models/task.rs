use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{null_as_empty, RequestBody};

/// Represents a task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier (UUID v4 string), immutable after creation.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Identifier of the user who created the task.
    pub user_id: String,
    pub title: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub label: String,
}

/// A task ready for insertion; timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub desc: String,
    pub label: String,
}

impl NewTask {
    /// Builds a new task owned by `user_id` with a freshly generated identifier.
    pub fn new(user_id: impl Into<String>, changes: TaskChanges) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: changes.title,
            desc: changes.desc,
            label: changes.label,
        }
    }
}

/// The mutable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: String,
    pub desc: String,
    pub label: String,
}

/// Payload for `POST /task`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTaskRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub desc: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub label: String,
}

impl RequestBody for CreateTaskRequest {
    const TARGET: &'static str = "/task";
}

/// Payload for `PUT /task/{id}`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EditTaskRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub desc: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub label: String,
}

impl RequestBody for EditTaskRequest {
    const TARGET: &'static str = "/task";
}

impl From<CreateTaskRequest> for TaskChanges {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            desc: req.desc,
            label: req.label,
        }
    }
}

impl From<EditTaskRequest> for TaskChanges {
    fn from(req: EditTaskRequest) -> Self {
        Self {
            title: req.title,
            desc: req.desc,
            label: req.label,
        }
    }
}

/// Query parameters for `GET /task`.
///
/// Values are kept as raw strings so unparseable input falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}
