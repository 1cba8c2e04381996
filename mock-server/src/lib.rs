use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Ids are assigned sequentially from 1; a BTreeMap keeps listings in id
/// order, matching insertion order.
pub struct Store {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

/// Router with no authentication; any bearer header is ignored.
pub fn app() -> Router {
    router(None)
}

/// Router that rejects requests lacking `Authorization: Bearer <token>`
/// with a 401 and the same body a real gateway would produce.
pub fn app_with_token(token: &str) -> Router {
    router(Some(token.to_string()))
}

fn router(required_token: Option<String>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        todos: BTreeMap::new(),
        next_id: 1,
    }));
    // The static filter routes must be declared before "/todos/{id}" so the
    // path parameter cannot shadow them.
    let mut router = Router::new()
        .route("/", get(root))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/completed", get(list_completed))
        .route("/todos/active", get(list_active))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(db);
    if let Some(token) = required_token {
        router = router.layer(middleware::from_fn_with_state(token, require_bearer));
    }
    router
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_bearer(State(expected): State<String>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        )
            .into_response();
    }
    next.run(request).await
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "Simple Todo API", "version": env!("CARGO_PKG_VERSION")}))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn list_completed(State(db): State<Db>) -> Json<Vec<Todo>> {
    Json(filtered(&db, true).await)
}

async fn list_active(State(db): State<Db>) -> Json<Vec<Todo>> {
    Json(filtered(&db, false).await)
}

async fn filtered(db: &Db, completed: bool) -> Vec<Todo> {
    db.read()
        .await
        .todos
        .values()
        .filter(|todo| todo.completed == completed)
        .cloned()
        .collect()
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> Response {
    if let Err(rejection) = validate(Some(&input.title), input.description.as_deref()) {
        return rejection;
    }
    let mut store = db.write().await;
    let now = Utc::now();
    let todo = Todo {
        id: store.next_id,
        title: input.title,
        description: input.description,
        completed: input.completed,
        created_at: now,
        updated_at: now,
    };
    store.next_id += 1;
    store.todos.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo)).into_response()
}

async fn get_todo(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    match db.read().await.todos.get(&id) {
        Some(todo) => Json(todo.clone()).into_response(),
        None => not_found(id),
    }
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Response {
    if let Err(rejection) = validate(input.title.as_deref(), input.description.as_deref()) {
        return rejection;
    }
    let mut store = db.write().await;
    let Some(todo) = store.todos.get_mut(&id) else {
        return not_found(id);
    };
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Utc::now();
    Json(todo.clone()).into_response()
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    match store.todos.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(id),
    }
}

fn validate(title: Option<&str>, description: Option<&str>) -> Result<(), Response> {
    if let Some(title) = title {
        if title.is_empty() {
            return Err(validation_error("title must not be empty"));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(validation_error("title must be at most 200 characters"));
        }
    }
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(validation_error(
                "description must be at most 500 characters",
            ));
        }
    }
    Ok(())
}

fn validation_error(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": message})),
    )
        .into_response()
}

fn not_found(id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": format!("Todo with id {id} not found")})),
    )
        .into_response()
}
