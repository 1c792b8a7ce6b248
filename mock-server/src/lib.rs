use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub groups: Vec<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: u64,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub groups: Vec<u64>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLinks {
    #[serde(default)]
    pub link_groups: Vec<u64>,
    #[serde(default)]
    pub unlink_groups: Vec<u64>,
}

/// Body of both `POST /groups` and `PUT /groups/{id}`.
#[derive(Deserialize)]
pub struct GroupInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoQuery {
    pub group_id: Option<u64>,
    pub group_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupQuery {
    pub name: Option<String>,
}

/// Error responses carry `{"detail": "..."}`.
#[derive(Debug)]
pub enum Rejection {
    NotFound(&'static str),
    Unprocessable(String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Rejection::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Rejection::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// `Json` extractor whose failures (bad syntax, wrong shape, missing
/// content type) answer `422` with a `{"detail"}` body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Rejection::Unprocessable(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// In-memory backing store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct Store {
    todos: BTreeMap<u64, Todo>,
    groups: BTreeMap<u64, Group>,
    last_todo_id: u64,
    last_group_id: u64,
}

impl Store {
    /// One `Daily` group with three todos linked to it.
    pub fn seeded() -> Self {
        let mut store = Self::default();
        let daily = store.insert_group("Daily".to_string(), Some("Daily todos".to_string()));
        store.insert_todo(
            "Buy bread".to_string(),
            Some("Check how much is left and provide some".to_string()),
            vec![daily],
        );
        store.insert_todo("Check messages".to_string(), None, vec![daily]);
        store.insert_todo(
            "Go to Bed".to_string(),
            Some("Self-explanatory".to_string()),
            vec![daily],
        );
        store
    }

    fn insert_group(&mut self, name: String, description: Option<String>) -> u64 {
        self.last_group_id += 1;
        let id = self.last_group_id;
        self.groups.insert(
            id,
            Group {
                id,
                name,
                description,
            },
        );
        id
    }

    fn insert_todo(&mut self, title: String, description: Option<String>, groups: Vec<u64>) -> u64 {
        self.last_todo_id += 1;
        let id = self.last_todo_id;
        self.todos.insert(
            id,
            Todo {
                id,
                title,
                description,
                groups,
            },
        );
        id
    }

    fn check_groups(&self, ids: &[u64]) -> Result<(), Rejection> {
        match ids.iter().find(|id| !self.groups.contains_key(*id)) {
            Some(missing) => Err(Rejection::Unprocessable(format!(
                "group {missing} does not exist"
            ))),
            None => Ok(()),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    router(Store::default())
}

pub fn router(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).patch(patch_todo_groups),
        )
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{id}", get(get_group).put(update_group))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn serve(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, todos = store.todos.len(), groups = store.groups.len(), "mock backend listening");
    }
    axum::serve(listener, router(store)).await
}

async fn list_todos(State(db): State<Db>, Query(query): Query<TodoQuery>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let named: Option<Vec<u64>> = query.group_name.as_ref().map(|name| {
        store
            .groups
            .values()
            .filter(|group| &group.name == name)
            .map(|group| group.id)
            .collect()
    });
    let todos = store
        .todos
        .values()
        .filter(|todo| query.group_id.map_or(true, |id| todo.groups.contains(&id)))
        .filter(|todo| {
            named
                .as_ref()
                .map_or(true, |ids| todo.groups.iter().any(|id| ids.contains(id)))
        })
        .cloned()
        .collect();
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    JsonBody(input): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<Created>), Rejection> {
    let mut store = db.write().await;
    store.check_groups(&input.groups)?;
    let id = store.insert_todo(input.title, input.description, input.groups);
    debug!(id, "created todo");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, Rejection> {
    let store = db.read().await;
    store
        .todos
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Rejection::NotFound("Todo"))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<UpdateTodo>,
) -> Result<Json<Todo>, Rejection> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(Rejection::NotFound("Todo"))?;
    todo.title = input.title;
    todo.description = input.description;
    Ok(Json(todo.clone()))
}

async fn patch_todo_groups(
    State(db): State<Db>,
    Path(id): Path<u64>,
    JsonBody(links): JsonBody<GroupLinks>,
) -> Result<Json<Todo>, Rejection> {
    let mut store = db.write().await;
    if !store.todos.contains_key(&id) {
        return Err(Rejection::NotFound("Todo"));
    }
    store.check_groups(&links.link_groups)?;
    let todo = store.todos.get_mut(&id).ok_or(Rejection::NotFound("Todo"))?;
    for group in links.link_groups {
        if !todo.groups.contains(&group) {
            todo.groups.push(group);
        }
    }
    todo.groups.retain(|group| !links.unlink_groups.contains(group));
    Ok(Json(todo.clone()))
}

async fn list_groups(State(db): State<Db>, Query(query): Query<GroupQuery>) -> Json<Vec<Group>> {
    let store = db.read().await;
    let groups = store
        .groups
        .values()
        .filter(|group| query.name.as_ref().map_or(true, |name| &group.name == name))
        .cloned()
        .collect();
    Json(groups)
}

async fn create_group(
    State(db): State<Db>,
    JsonBody(input): JsonBody<GroupInput>,
) -> (StatusCode, Json<Created>) {
    let id = db.write().await.insert_group(input.name, input.description);
    debug!(id, "created group");
    (StatusCode::CREATED, Json(Created { id }))
}

async fn get_group(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Group>, Rejection> {
    let store = db.read().await;
    store
        .groups
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Rejection::NotFound("Group"))
}

async fn update_group(
    State(db): State<Db>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<GroupInput>,
) -> Result<Json<Group>, Rejection> {
    let mut store = db.write().await;
    let group = store.groups.get_mut(&id).ok_or(Rejection::NotFound("Group"))?;
    group.name = input.name;
    group.description = input.description;
    Ok(Json(group.clone()))
}
