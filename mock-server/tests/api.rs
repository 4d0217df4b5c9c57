use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Blog, MockOptions};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

async fn send(
    app: &mut axum::routing::RouterIntoService<String>,
    request: Request<String>,
) -> axum::response::Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

const ADMIN: &str =
    r#"{"email":"admin@finxt.com","password":"admin123","name":"Admin","role":"admin"}"#;
const LOGIN: &str = r#"{"email":"admin@finxt.com","password":"admin123"}"#;

/// Bootstrap an admin and log in, returning the issued token.
async fn token(app: &mut axum::routing::RouterIntoService<String>) -> String {
    let resp = send(app, json_request("POST", "/api/auth/create-admin", None, ADMIN)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = send(app, json_request("POST", "/api/auth/login", None, LOGIN)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn login_without_admin_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", None, LOGIN))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn only_create_admin_bootstrap_route_exists() {
    for path in ["/api/auth/reset-admin", "/api/admin/create", "/api/auth/register"] {
        let resp = app()
            .oneshot(json_request("POST", path, None, ADMIN))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn duplicate_admin_is_bad_request() {
    let mut app = app().into_service();
    let _ = token(&mut app).await;
    let resp = send(&mut app, json_request("POST", "/api/auth/create-admin", None, ADMIN)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Admin already exists");
}

#[tokio::test]
async fn check_admin_counts_admins_without_passwords() {
    let mut app = app().into_service();
    let _ = token(&mut app).await;
    let resp = send(&mut app, empty_request("GET", "/api/auth/check-admin", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert!(body["admins"][0].get("password").is_none());
}

// --- blogs ---

#[tokio::test]
async fn list_blogs_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/blogs", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["blogs"], serde_json::json!([]));
}

#[tokio::test]
async fn create_blog_requires_token() {
    let resp = app()
        .oneshot(json_request("POST", "/api/blogs", None, r#"{"title":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Not authorized, no token");
}

#[tokio::test]
async fn create_blog_with_unknown_token_is_unauthorized() {
    let resp = app()
        .oneshot(json_request("POST", "/api/blogs", Some("forged"), r#"{"title":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_blog_without_title_reports_error_field() {
    let mut app = app().into_service();
    let token = token(&mut app).await;
    let resp = send(
        &mut app,
        json_request("POST", "/api/blogs", Some(&token), r#"{"slug":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Title is required");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn get_blog_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/blogs/missing", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_route_can_be_disabled() {
    let mut app = app_with(MockOptions {
        patch_enabled: false,
    })
    .into_service();
    let token = token(&mut app).await;
    let resp = send(
        &mut app,
        json_request("POST", "/api/blogs", Some(&token), r#"{"title":"Draft"}"#),
    )
    .await;
    let body: Value = body_json(resp).await;
    let id = body["blog"]["_id"].as_str().unwrap().to_string();

    let uri = format!("/api/blogs/{id}");
    let resp = send(
        &mut app,
        json_request("PATCH", &uri, Some(&token), r#"{"published":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn blog_lifecycle() {
    let mut app = app().into_service();
    let token = token(&mut app).await;

    // create: slug is normalized server-side
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/blogs",
            Some(&token),
            r#"{"title":"Hello World","slug":"Hello World!","content":"<p>hi</p>","tags":["a","b"]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    let created: Blog = serde_json::from_value(body["blog"].clone()).unwrap();
    assert_eq!(created.slug, "hello-world");
    assert!(!created.published);
    let id = created.id.clone();
    let uri = format!("/api/blogs/{id}");

    // list contains it
    let resp = send(&mut app, empty_request("GET", "/api/blogs", None)).await;
    let body: Value = body_json(resp).await;
    let blogs: Vec<Blog> = serde_json::from_value(body["blogs"].clone()).unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].id, id);

    // patch publishes without touching other fields
    let resp = send(
        &mut app,
        json_request("PATCH", &uri, Some(&token), r#"{"published":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["blog"]["published"], true);
    assert_eq!(body["blog"]["title"], "Hello World");

    // put updates tags
    let resp = send(
        &mut app,
        json_request("PUT", &uri, Some(&token), r#"{"tags":["c"]}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // get reflects both updates
    let resp = send(&mut app, empty_request("GET", &uri, None)).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["blog"]["tags"], serde_json::json!(["c"]));
    assert_eq!(body["blog"]["published"], true);

    // delete
    let resp = send(&mut app, empty_request("DELETE", &uri, Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_bytes(resp).await.is_empty());

    // delete again: 404
    let resp = send(&mut app, empty_request("DELETE", &uri, Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = send(&mut app, empty_request("GET", "/api/blogs", None)).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["blogs"], serde_json::json!([]));
}
