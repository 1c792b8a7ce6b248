//! Networked client for the todo API.
//!
//! `ApiClient` pairs a [`TodoClient`] with a [`Transport`]. Every operation
//! builds a request, runs it through [`ApiClient::send`], and returns the
//! decoded payload. `send` is the only place that performs I/O, and it
//! rejects any response outside [200, 300).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Created, Group, GroupFilter, GroupLinks, GroupUpdate, NewGroup, NewTodo, Todo, TodoFilter,
    TodoUpdate,
};

#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    client: TodoClient,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = config
            .headers
            .iter()
            .fold(TodoClient::new(&config.base_url), |client, (name, value)| {
                client.with_header(name.clone(), value.clone())
            });
        Self {
            client,
            transport: UreqTransport::new(config.timeout),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn request_builder(&self) -> &TodoClient {
        &self.client
    }

    /// Execute `request`, enforce a 2xx status, and decode the body as `R`.
    pub fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        debug!(method = %request.method, url = %request.full_url(), "todo api request");
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, "todo api response");
        self.client.parse_json(response)
    }

    /// `GET` an arbitrary path and decode the response.
    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let request = self
            .client
            .build_request::<()>(HttpMethod::Get, path, Vec::new(), None)?;
        self.send(request)
    }

    /// `POST` a JSON body to an arbitrary path and decode the response.
    pub fn post<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let request = self
            .client
            .build_request(HttpMethod::Post, path, Vec::new(), Some(body))?;
        self.send(request)
    }

    pub fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>, ApiError> {
        self.send(self.client.build_list_todos(filter))
    }

    pub fn get_todo(&self, id: u64) -> Result<Todo, ApiError> {
        self.send(self.client.build_get_todo(id))
    }

    pub fn create_todo(&self, input: &NewTodo) -> Result<Created, ApiError> {
        self.send(self.client.build_create_todo(input)?)
    }

    pub fn update_todo(&self, id: u64, input: &TodoUpdate) -> Result<Todo, ApiError> {
        self.send(self.client.build_update_todo(id, input)?)
    }

    pub fn patch_todo_groups(&self, id: u64, links: &GroupLinks) -> Result<Todo, ApiError> {
        self.send(self.client.build_patch_todo_groups(id, links)?)
    }

    pub fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>, ApiError> {
        self.send(self.client.build_list_groups(filter))
    }

    pub fn get_group(&self, id: u64) -> Result<Group, ApiError> {
        self.send(self.client.build_get_group(id))
    }

    pub fn create_group(&self, input: &NewGroup) -> Result<Created, ApiError> {
        self.send(self.client.build_create_group(input)?)
    }

    pub fn update_group(&self, id: u64, input: &GroupUpdate) -> Result<Group, ApiError> {
        self.send(self.client.build_update_group(id, input)?)
    }
}
