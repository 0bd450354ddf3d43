#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tokio::net::TcpListener;
use verdant_vistas::{
    AppState, create_router,
    config::AppConfig,
    models::{ArticleView, ContactForm, CreateArticleRequest, UpdateArticleRequest, User},
    repository::{Repository, RepositoryState},
    token::TokenService,
};

/// A stored article as the mock sees it: the joined view plus the columns
/// the view does not expose.
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub view: ArticleView,
    pub slug: String,
    pub author_id: i64,
    pub is_published: bool,
}

/// MockRepository
///
/// In-memory stand-in for the Postgres store, used by manager and HTTP-level
/// tests. `store_calls` counts every store touch so tests can assert that a
/// path never reached the persistence layer.
#[derive(Default)]
pub struct MockRepository {
    pub users: Mutex<Vec<User>>,
    pub articles: Mutex<Vec<StoredArticle>>,
    pub contacts: Mutex<Vec<ContactForm>>,
    pub subscribers: Mutex<Vec<String>>,
    pub store_calls: AtomicUsize,
}

impl MockRepository {
    fn touched(&self) {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    /// Display name the joined queries would produce for an author id.
    fn author_display_name(&self, author_id: i64) -> String {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == author_id)
            .map(|u| u.full_name.clone().unwrap_or_else(|| u.username.clone()))
            .unwrap_or_else(|| "Super Admin".to_string())
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list_published_articles(&self) -> Result<Vec<ArticleView>, sqlx::Error> {
        self.touched();
        let mut published: Vec<StoredArticle> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_published)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.view.created_at.cmp(&a.view.created_at));
        Ok(published.into_iter().map(|a| a.view).collect())
    }

    async fn find_article(&self, id: i64) -> Result<Option<ArticleView>, sqlx::Error> {
        self.touched();
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.view.id == id)
            .map(|a| a.view.clone()))
    }

    async fn insert_article(
        &self,
        req: &CreateArticleRequest,
        slug: &str,
        author_id: i64,
    ) -> Result<(), sqlx::Error> {
        self.touched();
        let author_name = self.author_display_name(author_id);
        let mut articles = self.articles.lock().unwrap();
        let id = articles.iter().map(|a| a.view.id).max().unwrap_or(0) + 1;
        articles.push(StoredArticle {
            view: ArticleView {
                id,
                title: req.title.clone(),
                excerpt: Some(req.excerpt.clone()),
                content: req.content.clone(),
                created_at: Utc::now(),
                cover_image_url: Some(req.cover_image_url.clone()),
                author_name,
                category_name: None,
            },
            slug: slug.to_string(),
            author_id,
            is_published: req.is_published,
        });
        Ok(())
    }

    async fn update_article(
        &self,
        id: i64,
        changes: &UpdateArticleRequest,
    ) -> Result<u64, sqlx::Error> {
        self.touched();
        let mut articles = self.articles.lock().unwrap();
        let Some(article) = articles.iter_mut().find(|a| a.view.id == id) else {
            return Ok(0);
        };

        if let Some(title) = &changes.title {
            article.view.title = title.clone();
        }
        if let Some(excerpt) = &changes.excerpt {
            article.view.excerpt = Some(excerpt.clone());
        }
        if let Some(content) = &changes.content {
            article.view.content = content.clone();
        }
        if let Some(cover_image_url) = &changes.cover_image_url {
            article.view.cover_image_url = Some(cover_image_url.clone());
        }
        if let Some(is_published) = changes.is_published {
            article.is_published = is_published;
        }
        // category_id changes have no visible effect here: the mock does not
        // model the categories table, so category_name stays None.

        Ok(1)
    }

    async fn delete_article(&self, id: i64) -> Result<u64, sqlx::Error> {
        self.touched();
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.view.id != id);
        Ok((before - articles.len()) as u64)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        self.touched();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_admin_user(&self, email: &str) -> Result<i64, sqlx::Error> {
        self.touched();
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: "admin".to_string(),
            email: email.to_string(),
            full_name: Some("Super Admin".to_string()),
            role: "admin".to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn insert_contact_message(&self, form: &ContactForm) -> Result<(), sqlx::Error> {
        self.touched();
        self.contacts.lock().unwrap().push(form.clone());
        Ok(())
    }

    async fn insert_subscriber_if_absent(&self, email: &str) -> Result<bool, sqlx::Error> {
        self.touched();
        let mut subscribers = self.subscribers.lock().unwrap();
        if subscribers.iter().any(|s| s == email) {
            return Ok(false);
        }
        subscribers.push(email.to_string());
        Ok(true)
    }
}

/// Builds an AppState around a shared mock store and the default test
/// configuration.
pub fn test_state(repo: Arc<MockRepository>) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        config: AppConfig::default(),
    }
}

pub struct TestApp {
    pub address: String,
    pub repo: Arc<MockRepository>,
    pub config: AppConfig,
}

/// Spawns the full router on an ephemeral port, backed by the mock store.
pub async fn spawn_app() -> TestApp {
    let repo = Arc::new(MockRepository::default());
    let state = test_state(repo.clone());
    let config = state.config.clone();
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        repo,
        config,
    }
}

/// Issues a token signed with the test configuration's secret.
pub fn issue_token(config: &AppConfig, subject_id: i64, role: &str) -> String {
    TokenService::new(config.jwt_secret.clone())
        .issue(subject_id, role)
        .expect("token issuance failed")
}
