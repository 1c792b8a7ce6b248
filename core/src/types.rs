//! Request and response records for the todo API.
//!
//! # Design
//! Every endpoint gets its own record so request bodies have a fixed wire
//! shape. These types are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two.
//!
//! Ids are assigned by the backend. Records that come back from reads carry
//! `id: Option<u64>` because the backend may omit it, and the creation
//! payloads have no id field at all.

use serde::{Deserialize, Serialize};

use crate::query::{query_params, QueryValue};

/// A todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ids of the groups this todo is linked to, in link order.
    #[serde(default)]
    pub groups: Vec<u64>,
}

/// A group returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of a `201 Created` response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: u64,
}

/// Request payload for `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub groups: Vec<u64>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            groups: Vec::new(),
        }
    }
}

/// Request payload for `PUT /todos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for `PATCH /todos/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupLinks {
    #[serde(default)]
    pub link_groups: Vec<u64>,
    #[serde(default)]
    pub unlink_groups: Vec<u64>,
}

/// Request payload for `POST /groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for `PUT /groups/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filters accepted by `GET /todos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub group_id: Option<u64>,
    pub group_name: Option<String>,
}

impl TodoFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        let candidates: [(&str, &dyn QueryValue); 2] = [
            ("group_id", &self.group_id),
            ("group_name", &self.group_name),
        ];
        query_params(&candidates)
    }
}

/// Filters accepted by `GET /groups`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub name: Option<String>,
}

impl GroupFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        let candidates: [(&str, &dyn QueryValue); 1] = [("name", &self.name)];
        query_params(&candidates)
    }
}
