//! Client for the todo service's REST API (todos and groups).
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `ApiClient` pairs it with a `Transport`
//! (by default a `ureq` agent) and returns decoded payloads.
//!
//! # Design
//! - Clients are stateless: a base URL, default headers, and a transport.
//!   They are `Send + Sync` and can be shared across threads.
//! - Every response outside [200, 300) is an `ApiError::Status`. Failures
//!   with no response at all are `ApiError::Transport`.
//! - Optional filters are mapped to query parameters by a pure function that
//!   drops falsy values (see [`query::query_params`]).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{
    Created, Group, GroupFilter, GroupLinks, GroupUpdate, NewGroup, NewTodo, Todo, TodoFilter,
    TodoUpdate,
};
