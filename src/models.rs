use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A row in the `users` table. Operationally only one row matters: the admin
/// identity, provisioned lazily on first successful login. The password
/// credential is a placeholder (`env_managed`) because authentication happens
/// against the configured credential pair, not against this column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    // The RBAC field: 'user' or 'admin'.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Category
///
/// A row in the `categories` table. Articles reference a category optionally;
/// deleting a category nulls the reference on its articles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// ArticleView
///
/// The joined article shape exposed to clients, produced by the list and
/// detail queries (posts joined with the author's full name and the category
/// name). Storage column names are renamed at the serialization boundary:
/// `created_at` → `date`, `cover_image_url` → `image`, `author_name` →
/// `author`, `category_name` → `category`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ArticleView {
    pub id: i64,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,

    #[serde(rename = "date")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "image")]
    pub cover_image_url: Option<String>,

    #[serde(rename = "author")]
    pub author_name: String,

    #[serde(rename = "category")]
    pub category_name: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateArticleRequest
///
/// Input payload for submitting a new article (POST /articles). The slug is
/// not part of the payload; it is derived from the title at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateArticleRequest {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub cover_image_url: String,
    #[serde(default = "default_is_published")]
    pub is_published: bool,
}

fn default_is_published() -> bool {
    true
}

/// UpdateArticleRequest
///
/// Partial update payload for PUT /articles/{id}. Every field is
/// independently optional; only the fields present in the payload end up in
/// the UPDATE statement. The slug is never recomputed, even when the title
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl UpdateArticleRequest {
    /// True when no field is present, in which case the update is a no-op
    /// that never reaches the store.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.category_id.is_none()
            && self.cover_image_url.is_none()
            && self.is_published.is_none()
    }
}

/// ContactForm
///
/// Input payload for POST /contact. The wire format uses camelCase keys
/// (`firstName`, `lastName`) as sent by the frontend form.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// NewsletterSignup
///
/// Input payload for POST /subscribe.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NewsletterSignup {
    pub email: String,
}

// --- Response Payloads (Output Schemas) ---

/// LoginUser
///
/// The minimal user-display payload returned alongside a fresh token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginUser {
    pub name: String,
    pub role: String,
}

/// LoginResponse
///
/// Output of a successful POST /login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Confirmation
///
/// The generic acknowledgement returned by all write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
