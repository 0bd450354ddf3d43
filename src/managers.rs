use crate::{
    config::AppConfig,
    error::ApiError,
    models::{
        ArticleView, Confirmation, ContactForm, CreateArticleRequest, LoginResponse, LoginUser,
        UpdateArticleRequest,
    },
    repository::RepositoryState,
    token::TokenService,
};

/// Derives the URL slug for an article: the lowercased title with spaces
/// replaced by hyphens. Computed once at creation time and never re-derived,
/// even when a later update changes the title. There is no uniqueness check
/// against existing slugs; a collision surfaces as the store's
/// unique-constraint error.
pub fn derive_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// AuthManager
///
/// Validates admin credentials, lazily provisions the admin user row, and
/// issues a bearer token. Constructed per request with the store handle and
/// the configuration carrying the credential pair and signing secret.
pub struct AuthManager {
    repo: RepositoryState,
    config: AppConfig,
}

impl AuthManager {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self { repo, config }
    }

    /// The login state machine:
    /// 1. Plaintext comparison against the configured admin pair; mismatch
    ///    fails with `InvalidCredentials` before the store is touched.
    /// 2. Look up the admin row by email; insert it if absent. An insert
    ///    failure rolls back and fails with `AdminProvisioning`.
    /// 3. Issue a token with role `admin` and return it with the display
    ///    payload.
    ///
    /// At most one admin row is ever created, on the first successful login.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        if email != self.config.admin_email || password != self.config.admin_password {
            return Err(ApiError::InvalidCredentials);
        }

        let (admin_id, display_name) = match self
            .repo
            .find_user_by_email(&self.config.admin_email)
            .await?
        {
            Some(user) => {
                let name = user.full_name.unwrap_or(user.username);
                (user.id, name)
            }
            None => {
                tracing::info!("admin row absent, provisioning on first login");
                let id = self
                    .repo
                    .insert_admin_user(&self.config.admin_email)
                    .await
                    .map_err(ApiError::AdminProvisioning)?;
                (id, "Super Admin".to_string())
            }
        };

        let token = TokenService::new(self.config.jwt_secret.clone()).issue(admin_id, "admin")?;

        Ok(LoginResponse {
            token,
            user: LoginUser {
                name: display_name,
                role: "admin".to_string(),
            },
        })
    }
}

/// ArticleManager
///
/// CRUD logic for articles: slug derivation at creation, partial-update
/// assembly, and the read contract with author/category names joined in.
pub struct ArticleManager {
    repo: RepositoryState,
}

impl ArticleManager {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// All published articles, newest creation timestamp first.
    pub async fn list_published(&self) -> Result<Vec<ArticleView>, ApiError> {
        Ok(self.repo.list_published_articles().await?)
    }

    /// Single article by id. A missing row is `NotFound`, never a store
    /// error.
    pub async fn get(&self, id: i64) -> Result<ArticleView, ApiError> {
        self.repo.find_article(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn create(
        &self,
        input: CreateArticleRequest,
        author_id: i64,
    ) -> Result<Confirmation, ApiError> {
        let slug = derive_slug(&input.title);

        self.repo.insert_article(&input, &slug, author_id).await?;

        Ok(Confirmation::new("Article Created Successfully"))
    }

    /// Applies a partial update. An empty change set is confirmed without
    /// touching the store; otherwise exactly the present fields are written.
    /// The row's slug is left as-is regardless of a title change.
    pub async fn update(
        &self,
        id: i64,
        changes: UpdateArticleRequest,
    ) -> Result<Confirmation, ApiError> {
        if changes.is_empty() {
            return Ok(Confirmation::new("No changes detected"));
        }

        self.repo.update_article(id, &changes).await?;

        Ok(Confirmation::new("Article Updated"))
    }

    pub async fn delete(&self, id: i64) -> Result<Confirmation, ApiError> {
        if self.repo.delete_article(id).await? == 0 {
            return Err(ApiError::NotFound);
        }

        Ok(Confirmation::new("Article Deleted"))
    }
}

/// ContactManager
///
/// Insert-only handler for contact-form submissions. No deduplication, no
/// rate limiting.
pub struct ContactManager {
    repo: RepositoryState,
}

impl ContactManager {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, form: ContactForm) -> Result<Confirmation, ApiError> {
        self.repo.insert_contact_message(&form).await?;

        Ok(Confirmation::new("Message received successfully"))
    }
}

/// NewsletterManager
///
/// Insert-only subscription handler. A duplicate email is skipped by the
/// store and still reported as success, so subscribing is idempotent from
/// the caller's point of view.
pub struct NewsletterManager {
    repo: RepositoryState,
}

impl NewsletterManager {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    pub async fn subscribe(&self, email: &str) -> Result<Confirmation, ApiError> {
        self.repo.insert_subscriber_if_absent(email).await?;

        Ok(Confirmation::new("Subscribed successfully"))
    }
}
