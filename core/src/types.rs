//! Domain DTOs for the blog admin API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift. The backend keys documents by
//! `_id`, so ids accept both `_id` and `id` on the way in.
//!
//! Response envelopes are lenient (`#[serde(default)]` everywhere) because
//! the backend's shapes have drifted over time; deciding whether a missing
//! field is fatal belongs to the caller, not to deserialization.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// The logged-in administrator as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A blog post as stored by the backend.
///
/// Equality treats `tags` as a multiset: two posts with the same tags in a
/// different order are equal, but display keeps the server's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl PartialEq for Blog {
    fn eq(&self, other: &Self) -> bool {
        let mut ours: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        let mut theirs: Vec<&str> = other.tags.iter().map(String::as_str).collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        self.id == other.id
            && self.title == other.title
            && self.slug == other.slug
            && self.content == other.content
            && self.thumbnail == other.thumbnail
            && self.published == other.published
            && self.created_at == other.created_at
            && ours == theirs
    }
}

impl Eq for Blog {}

/// Editor form state: what the operator typed, before payload shaping.
///
/// `tags` is the raw comma-separated input and `thumbnail` an opaque
/// URL/data string where empty means "no thumbnail".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub thumbnail: String,
    pub tags: String,
}

impl BlogDraft {
    /// Shape the draft into the wire payload for create/update.
    pub fn to_payload(&self) -> BlogPayload {
        let thumbnail = Some(self.thumbnail.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        BlogPayload {
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            thumbnail,
            tags: parse_tags(&self.tags),
        }
    }
}

impl From<&Blog> for BlogDraft {
    /// Prefill for the edit form.
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            content: blog.content.clone(),
            thumbnail: blog.thumbnail.clone().unwrap_or_default(),
            tags: blog.tags.join(", "),
        }
    }
}

/// Request body for creating or updating a blog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPayload {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for the publish toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishPayload {
    pub published: bool,
}

/// Split a comma-separated tag input: trim each entry, drop empties, keep
/// order.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// A nested field that does not fit its type reads as absent instead of
/// failing the whole envelope.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub admin: Option<Admin>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// Fixed payload sent to every bootstrap candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

impl Default for BootstrapRequest {
    fn default() -> Self {
        Self {
            email: "admin@finxt.com".to_string(),
            password: "admin123".to_string(),
            name: "Admin".to_string(),
            role: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub admin: Option<Admin>,
    #[serde(default, deserialize_with = "lenient")]
    pub credentials: Option<Credentials>,
}

/// Result of a successful bootstrap probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// Candidate path that accepted the request.
    pub endpoint: String,
    /// Credentials to prefill the login form with.
    pub credentials: Credentials,
    /// The backend explicitly acknowledged the creation. When false the
    /// account may still exist; the operator should just try logging in.
    pub confirmed: bool,
}

/// Diagnostics answer of `GET /auth/check-admin`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AdminStatus {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub admins: Vec<Admin>,
}

/// Entries stay raw so one undecodable post does not hide the others.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BlogListEnvelope {
    #[serde(default)]
    pub blogs: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BlogEnvelope {
    #[serde(default)]
    pub blog: Option<Blog>,
}
