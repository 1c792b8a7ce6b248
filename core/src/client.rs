//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a base URL and its default headers and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. Requests with a body go through
//! [`TodoClient::build_request`]; every parser goes through
//! [`TodoClient::parse_json`], which rejects any status outside [200, 300).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Created, Group, GroupFilter, GroupLinks, GroupUpdate, NewGroup, NewTodo, Todo, TodoFilter,
    TodoUpdate,
};

const JSON: &str = "application/json";

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: vec![
                ("content-type".to_string(), JSON.to_string()),
                ("accept".to_string(), JSON.to_string()),
            ],
        }
    }

    /// Add a header sent with every request, after the JSON defaults.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative to the base URL) with the default
    /// headers and an optional JSON body.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            query,
            headers: self.headers.clone(),
            body,
        })
    }

    fn get_request(&self, path: &str, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            query,
            headers: self.headers.clone(),
            body: None,
        }
    }

    /// Enforce a 2xx status and decode the body as `T`.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    // Todos

    pub fn build_list_todos(&self, filter: &TodoFilter) -> HttpRequest {
        self.get_request("todos", filter.query())
    }

    pub fn build_get_todo(&self, id: u64) -> HttpRequest {
        self.get_request(&format!("todos/{id}"), Vec::new())
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "todos", Vec::new(), Some(input))
    }

    pub fn build_update_todo(&self, id: u64, input: &TodoUpdate) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Put, &format!("todos/{id}"), Vec::new(), Some(input))
    }

    pub fn build_patch_todo_groups(
        &self,
        id: u64,
        links: &GroupLinks,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Patch, &format!("todos/{id}"), Vec::new(), Some(links))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Created, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_patch_todo_groups(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        self.parse_json(response)
    }

    // Groups

    pub fn build_list_groups(&self, filter: &GroupFilter) -> HttpRequest {
        self.get_request("groups", filter.query())
    }

    pub fn build_get_group(&self, id: u64) -> HttpRequest {
        self.get_request(&format!("groups/{id}"), Vec::new())
    }

    pub fn build_create_group(&self, input: &NewGroup) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "groups", Vec::new(), Some(input))
    }

    pub fn build_update_group(
        &self,
        id: u64,
        input: &GroupUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Put, &format!("groups/{id}"), Vec::new(), Some(input))
    }

    pub fn parse_list_groups(&self, response: HttpResponse) -> Result<Vec<Group>, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_get_group(&self, response: HttpResponse) -> Result<Group, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_create_group(&self, response: HttpResponse) -> Result<Created, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_update_group(&self, response: HttpResponse) -> Result<Group, ApiError> {
        self.parse_json(response)
    }
}

/// Map any status outside [200, 300) to `ApiError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    Err(ApiError::Status {
        status: response.status,
        status_text: response.status_text().to_string(),
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn body_of(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn every_request_carries_json_headers() {
        let req = client().build_get_todo(1);
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Accept"), Some("application/json"));
    }

    #[test]
    fn extra_headers_follow_defaults() {
        let req = TodoClient::new("http://localhost:3000")
            .with_header("x-request-id", "abc")
            .build_get_group(1);
        assert_eq!(req.headers.len(), 3);
        assert_eq!(req.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn build_list_todos_without_filter_has_no_query() {
        let req = client().build_list_todos(&TodoFilter::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/todos");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_todos_by_group_name() {
        let filter = TodoFilter {
            group_id: None,
            group_name: Some("Daily".to_string()),
        };
        let req = client().build_list_todos(&filter);
        assert_eq!(req.full_url(), "http://localhost:3000/todos?group_name=Daily");
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/todos/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = NewTodo {
            title: "Buy groceries".to_string(),
            description: Some("Milk, Bread, Eggs and others".to_string()),
            groups: vec![],
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/todos");
        assert_eq!(
            body_of(&req),
            json!({
                "title": "Buy groceries",
                "description": "Milk, Bread, Eggs and others",
                "groups": []
            })
        );
    }

    #[test]
    fn build_update_todo_sends_title_and_description_only() {
        let input = TodoUpdate {
            title: "Updated".to_string(),
            description: None,
        };
        let req = client().build_update_todo(3, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/todos/3");
        assert_eq!(body_of(&req), json!({"title": "Updated"}));
    }

    #[test]
    fn build_patch_todo_groups_produces_correct_request() {
        let links = GroupLinks {
            link_groups: vec![2],
            unlink_groups: vec![],
        };
        let req = client().build_patch_todo_groups(3, &links).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:3000/todos/3");
        assert_eq!(body_of(&req), json!({"linkGroups": [2], "unlinkGroups": []}));
    }

    #[test]
    fn build_list_groups_filters_by_name_only() {
        let filter = GroupFilter {
            name: Some("Home Stuff".to_string()),
        };
        let req = client().build_list_groups(&filter);
        assert_eq!(req.query, vec![("name".to_string(), "Home Stuff".to_string())]);
        assert_eq!(req.full_url(), "http://localhost:3000/groups?name=Home+Stuff");
    }

    #[test]
    fn build_group_writes() {
        let create = client()
            .build_create_group(&NewGroup {
                name: "Group A".to_string(),
                description: Some("A sample group".to_string()),
            })
            .unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.url, "http://localhost:3000/groups");
        assert_eq!(
            body_of(&create),
            json!({"name": "Group A", "description": "A sample group"})
        );

        let update = client()
            .build_update_group(
                1,
                &GroupUpdate {
                    name: "Group B".to_string(),
                    description: None,
                },
            )
            .unwrap();
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.url, "http://localhost:3000/groups/1");
        assert_eq!(body_of(&update), json!({"name": "Group B"}));
    }

    #[test]
    fn parse_list_todos_success() {
        let body = r#"[{"title":"Buy groceries","description":"Milk, Bread, Eggs and others","groups":[]}]"#;
        let todos = client().parse_list_todos(response(200, body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Buy groceries");
        assert_eq!(todos[0].id, None);
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client()
            .parse_get_todo(response(404, r#"{"detail":"Todo not found"}"#))
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            ApiError::Status {
                status,
                status_text,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert!(body.contains("Todo not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_create_todo_success() {
        let created = client().parse_create_todo(response(201, r#"{"id":1}"#)).unwrap();
        assert_eq!(created, Created { id: 1 });
    }

    #[test]
    fn parse_create_group_server_error() {
        let err = client()
            .parse_create_group(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn redirect_status_is_an_error() {
        let err = client().parse_get_group(response(302, "")).unwrap_err();
        assert_eq!(err.status(), Some(302));
    }

    #[test]
    fn any_2xx_is_accepted() {
        let group = client()
            .parse_update_group(response(202, r#"{"id":1,"name":"A"}"#))
            .unwrap();
        assert_eq!(group.name, "A");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_groups(&GroupFilter::default());
        assert_eq!(req.url, "http://localhost:3000/groups");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
