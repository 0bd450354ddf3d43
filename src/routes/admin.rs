use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// The article mutation endpoints. `create_router` wraps this entire router
/// in the bearer-token middleware, so unauthenticated requests are rejected
/// with 401 before any handler runs; each handler then checks for the
/// 'admin' role and rejects everyone else with 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /articles
        // Submits a new article; the author id comes from the token subject.
        .route("/articles", post(handlers::create_article))
        // PUT/DELETE /articles/{id}
        // Partial update and removal of a single article.
        .route(
            "/articles/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
}
