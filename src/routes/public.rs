use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that are unauthenticated and accessible to any client. Article
/// reads only ever expose what the repository query allows: the listing is
/// restricted to published rows, while the detail lookup serves drafts too
/// (the admin frontend uses it for previews).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /login
        // Validates the admin credential pair and issues a bearer token.
        .route("/login", post(handlers::login))
        // GET /articles
        // Lists published articles, newest first.
        .route("/articles", get(handlers::get_articles))
        // GET /articles/{id}
        // Retrieves a single article by id.
        .route("/articles/{id}", get(handlers::get_article_details))
        // POST /contact
        // Records a contact-form submission.
        .route("/contact", post(handlers::submit_contact))
        // POST /subscribe
        // Adds a newsletter subscriber; duplicate emails still succeed.
        .route("/subscribe", post(handlers::subscribe_newsletter))
}
