use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AdminInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Create and update share one shape; every field is optional so PUT and
/// PATCH can both carry partial bodies.
#[derive(Deserialize, Default)]
pub struct BlogInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// Knobs for simulating backend variants.
#[derive(Clone, Copy, Debug)]
pub struct MockOptions {
    /// When false, `PATCH /blogs/{id}` answers 404 like a backend that never
    /// registered the route.
    pub patch_enabled: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self { patch_enabled: true }
    }
}

#[derive(Default)]
pub struct Store {
    admins: Vec<Admin>,
    tokens: HashMap<String, String>,
    blogs: Vec<Blog>,
}

pub type Db = Arc<RwLock<Store>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with(MockOptions::default())
}

/// All routes are served under `/api`, matching the client's default base URL.
pub fn app_with(options: MockOptions) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let blog_item = if options.patch_enabled {
        get(get_blog).put(update_blog).patch(update_blog).delete(delete_blog)
    } else {
        get(get_blog).put(update_blog).patch(patch_not_routed).delete(delete_blog)
    };
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/create-admin", post(create_admin))
        .route("/auth/check-admin", get(check_admin))
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/{id}", blog_item)
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockOptions::default()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    reply(status, json!({ "success": false, "message": message }))
}

/// Lowercase, alphanumerics kept, every other run collapsed into one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn authorize(headers: &HeaderMap, store: &Store) -> Result<(), Reply> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if store.tokens.contains_key(token) => Ok(()),
        Some(_) => Err(fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed")),
        None => Err(fail(StatusCode::UNAUTHORIZED, "Not authorized, no token")),
    }
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Reply {
    let mut store = db.write().await;
    let Some(admin) = store
        .admins
        .iter()
        .find(|a| a.email == input.email && a.password == input.password)
        .cloned()
    else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    let token = format!("mock-{}", Uuid::new_v4());
    store.tokens.insert(token.clone(), admin.id.clone());
    debug!(email = %admin.email, "login accepted");
    reply(
        StatusCode::OK,
        json!({ "success": true, "token": token, "admin": admin }),
    )
}

async fn create_admin(State(db): State<Db>, Json(input): Json<AdminInput>) -> Reply {
    let mut store = db.write().await;
    if store.admins.iter().any(|a| a.email == input.email) {
        return fail(StatusCode::BAD_REQUEST, "Admin already exists");
    }
    let admin = Admin {
        id: Uuid::new_v4().to_string(),
        email: input.email.clone(),
        name: input.name.unwrap_or_else(|| "Admin".to_string()),
        role: input.role.unwrap_or_else(|| "admin".to_string()),
        password: input.password.clone(),
    };
    store.admins.push(admin.clone());
    info!(email = %admin.email, "admin created");
    reply(
        StatusCode::CREATED,
        json!({
            "success": true,
            "message": "Admin created",
            "admin": admin,
            "credentials": { "email": input.email, "password": input.password },
        }),
    )
}

async fn check_admin(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    reply(
        StatusCode::OK,
        json!({ "success": true, "count": store.admins.len(), "admins": store.admins }),
    )
}

async fn list_blogs(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    reply(StatusCode::OK, json!({ "success": true, "blogs": store.blogs }))
}

async fn get_blog(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    match store.blogs.iter().find(|b| b.id == id) {
        Some(blog) => reply(StatusCode::OK, json!({ "success": true, "blog": blog })),
        None => fail(StatusCode::NOT_FOUND, "Blog not found"),
    }
}

async fn create_blog(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<BlogInput>,
) -> Reply {
    let mut store = db.write().await;
    if let Err(denied) = authorize(&headers, &store) {
        return denied;
    }
    let Some(title) = input.title.filter(|t| !t.trim().is_empty()) else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": "Title is required" }),
        );
    };
    let slug = slugify(input.slug.as_deref().unwrap_or(&title));
    if store.blogs.iter().any(|b| b.slug == slug) {
        return fail(StatusCode::BAD_REQUEST, "Slug already exists");
    }
    let blog = Blog {
        id: Uuid::new_v4().to_string(),
        title,
        slug,
        content: input.content.unwrap_or_default(),
        thumbnail: input.thumbnail.filter(|t| !t.is_empty()),
        tags: input.tags.unwrap_or_default(),
        published: input.published.unwrap_or(false),
        created_at: Utc::now(),
    };
    store.blogs.push(blog.clone());
    info!(id = %blog.id, slug = %blog.slug, "blog created");
    reply(StatusCode::CREATED, json!({ "success": true, "blog": blog }))
}

async fn update_blog(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<BlogInput>,
) -> Reply {
    let mut store = db.write().await;
    if let Err(denied) = authorize(&headers, &store) {
        return denied;
    }
    let Some(blog) = store.blogs.iter_mut().find(|b| b.id == id) else {
        return fail(StatusCode::NOT_FOUND, "Blog not found");
    };
    if let Some(title) = input.title {
        blog.title = title;
    }
    if let Some(slug) = input.slug {
        blog.slug = slugify(&slug);
    }
    if let Some(content) = input.content {
        blog.content = content;
    }
    if let Some(thumbnail) = input.thumbnail {
        blog.thumbnail = Some(thumbnail).filter(|t| !t.is_empty());
    }
    if let Some(tags) = input.tags {
        blog.tags = tags;
    }
    if let Some(published) = input.published {
        blog.published = published;
    }
    reply(StatusCode::OK, json!({ "success": true, "blog": blog }))
}

async fn patch_not_routed(Path(id): Path<String>) -> Reply {
    fail(StatusCode::NOT_FOUND, &format!("Cannot PATCH /api/blogs/{id}"))
}

async fn delete_blog(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut store = db.write().await;
    if let Err(denied) = authorize(&headers, &store) {
        return denied;
    }
    let before = store.blogs.len();
    store.blogs.retain(|b| b.id != id);
    if store.blogs.len() == before {
        return fail(StatusCode::NOT_FOUND, "Blog not found");
    }
    info!(%id, "blog deleted");
    reply(StatusCode::OK, json!({ "success": true, "message": "Blog deleted" }))
}
