use crate::{
    AppState,
    error::ApiError,
    managers::{ArticleManager, AuthManager, ContactManager, NewsletterManager},
    models::{
        ArticleView, Confirmation, ContactForm, CreateArticleRequest, LoginRequest, LoginResponse,
        NewsletterSignup, UpdateArticleRequest,
    },
    token::AuthUser,
};
use axum::{
    Json,
    extract::{Path, State},
};

// Managers are constructed per request with the shared store handle, so no
// session state outlives the operation that acquired it.

/// login
///
/// [Public Route] Validates the admin credential pair and returns a fresh
/// bearer token plus the display payload. The admin user row is provisioned
/// lazily inside the manager on the first successful login.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Provisioning failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let manager = AuthManager::new(state.repo.clone(), state.config.clone());
    let response = manager.login(&payload.email, &payload.password).await?;
    Ok(Json(response))
}

/// get_articles
///
/// [Public Route] Lists all published articles, newest first, with author
/// and category names joined in.
#[utoipa::path(
    get,
    path = "/articles",
    responses((status = 200, description = "Published articles", body = [ArticleView]))
)]
pub async fn get_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleView>>, ApiError> {
    let manager = ArticleManager::new(state.repo.clone());
    Ok(Json(manager.list_published().await?))
}

/// get_article_details
///
/// [Public Route] Retrieves a single article by id. Drafts are reachable
/// here; only the listing filters on the published flag.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = ArticleView),
        (status = 404, description = "No such article")
    )
)]
pub async fn get_article_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleView>, ApiError> {
    let manager = ArticleManager::new(state.repo.clone());
    Ok(Json(manager.get(id).await?))
}

/// create_article
///
/// [Admin Route] Submits a new article. The author id is taken from the
/// verified token, and the slug is derived from the title by the manager.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 200, description = "Created", body = Confirmation),
        (status = 401, description = "Missing/expired token"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_article(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<Json<Confirmation>, ApiError> {
    if user.role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let manager = ArticleManager::new(state.repo.clone());
    Ok(Json(manager.create(payload, user.id).await?))
}

/// update_article
///
/// [Admin Route] Applies a partial update; an empty payload is acknowledged
/// without a store round trip. The slug is never recomputed.
#[utoipa::path(
    put,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = Confirmation),
        (status = 401, description = "Missing/expired token"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn update_article(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<Confirmation>, ApiError> {
    if user.role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let manager = ArticleManager::new(state.repo.clone());
    Ok(Json(manager.update(id, payload).await?))
}

/// delete_article
///
/// [Admin Route] Deletes by id; a zero-row delete reports 404.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted", body = Confirmation),
        (status = 401, description = "Missing/expired token"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such article")
    )
)]
pub async fn delete_article(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Confirmation>, ApiError> {
    if user.role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let manager = ArticleManager::new(state.repo.clone());
    Ok(Json(manager.delete(id).await?))
}

/// submit_contact
///
/// [Public Route] Records a contact-form submission.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactForm,
    responses((status = 200, description = "Recorded", body = Confirmation))
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactForm>,
) -> Result<Json<Confirmation>, ApiError> {
    let manager = ContactManager::new(state.repo.clone());
    Ok(Json(manager.submit(payload).await?))
}

/// subscribe_newsletter
///
/// [Public Route] Adds a newsletter subscriber. Subscribing an already-known
/// email reports success without inserting a second row.
#[utoipa::path(
    post,
    path = "/subscribe",
    request_body = NewsletterSignup,
    responses((status = 200, description = "Subscribed", body = Confirmation))
)]
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<NewsletterSignup>,
) -> Result<Json<Confirmation>, ApiError> {
    let manager = NewsletterManager::new(state.repo.clone());
    Ok(Json(manager.subscribe(&payload.email).await?))
}
