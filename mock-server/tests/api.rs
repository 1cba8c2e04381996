use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_token, Todo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn bearer_request(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

// --- root ---

#[tokio::test]
async fn root_reports_name_and_version() {
    let app = app();
    let resp = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Simple Todo API");
    assert!(body["version"].is_string());
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let app = app();
    let resp = app.oneshot(get_request("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/todos", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.id, 1);
    assert_eq!(todo.title, "Buy milk");
    assert!(todo.description.is_none());
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_todo_with_all_fields() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/todos",
            r#"{"title":"Already done","description":"was quick","completed":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.description.as_deref(), Some("was quick"));
    assert!(todo.completed);
}

#[tokio::test]
async fn create_todo_malformed_json_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/todos", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_todo_empty_title_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/todos", r#"{"title":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "title must not be empty");
}

#[tokio::test]
async fn create_todo_oversized_title_returns_422() {
    let app = app();
    let body = format!(r#"{{"title":"{}"}}"#, "x".repeat(201));
    let resp = app
        .oneshot(json_request("POST", "/todos", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_todo_oversized_description_returns_422() {
    let app = app();
    let body = format!(r#"{{"title":"ok","description":"{}"}}"#, "x".repeat(501));
    let resp = app
        .oneshot(json_request("POST", "/todos", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found_with_detail() {
    let app = app();
    let resp = app.oneshot(get_request("/todos/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "Todo with id 999 not found");
}

#[tokio::test]
async fn get_todo_bad_id_returns_400() {
    let app = app();
    let resp = app.oneshot(get_request("/todos/not-a-number")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let app = app();
    let resp = app
        .oneshot(json_request("PUT", "/todos/999", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_todo_rejects_empty_title() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/todos", r#"{"title":"Keep me"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/todos/1", r#"{"title":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // rejected update must not have touched the stored item
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/todos/1"))
        .await
        .unwrap();
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.title, "Keep me");
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/todos/999")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- filters ---

#[tokio::test]
async fn filter_routes_split_by_completed() {
    use tower::Service;

    let mut app = app().into_service();

    for body in [
        r#"{"title":"A"}"#,
        r#"{"title":"B","completed":true}"#,
        r#"{"title":"C"}"#,
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/todos", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/todos/completed"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Vec<Todo> = body_json(resp).await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].title, "B");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/todos/active"))
        .await
        .unwrap();
    let active: Vec<Todo> = body_json(resp).await;
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].title, "A");
    assert_eq!(active[1].title, "C");
}

// --- ids ---

#[tokio::test]
async fn ids_are_assigned_sequentially() {
    use tower::Service;

    let mut app = app().into_service();

    for (expected_id, title) in [(1, "first"), (2, "second"), (3, "third")] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/todos",
                &format!(r#"{{"title":"{title}"}}"#),
            ))
            .await
            .unwrap();
        let todo: Todo = body_json(resp).await;
        assert_eq!(todo.id, expected_id);
    }
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_token_returns_401() {
    let app = app_with_token("secret");
    let resp = app.oneshot(get_request("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn wrong_bearer_token_returns_401() {
    let app = app_with_token("secret");
    let resp = app
        .oneshot(bearer_request("/todos", "not-the-secret"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn correct_bearer_token_is_accepted() {
    let app = app_with_token("secret");
    let resp = app.oneshot(bearer_request("/todos", "secret")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn open_server_ignores_bearer_token() {
    let app = app();
    let resp = app
        .oneshot(bearer_request("/todos", "anything"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/todos", r#"{"title":"Walk dog"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = body_json(resp).await;
    assert_eq!(created.title, "Walk dog");
    assert!(!created.completed);
    let id = created.id;

    // list — should contain the one todo
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, id);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.title, "Walk dog");

    // update — partial: only completed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/todos/{id}"),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.title, "Walk dog"); // unchanged
    assert!(updated.completed);
    assert!(updated.updated_at >= updated.created_at);

    // update — partial: only title
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/todos/{id}"),
            r#"{"title":"Walk cat"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.title, "Walk cat");
    assert!(updated.completed); // unchanged from previous update

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/todos/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete — empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}
