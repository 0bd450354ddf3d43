use crate::models::{ArticleView, ContactForm, CreateArticleRequest, UpdateArticleRequest, User};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use std::sync::Arc;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Managers interact
/// with the store exclusively through this trait, which keeps them testable
/// against an in-memory mock and keeps every query parameterized in one
/// place.
///
/// Error discipline: methods return the raw `sqlx::Error`; the manager layer
/// maps it into the API error taxonomy. Every write acquires its own
/// transaction and commits or rolls back before returning — no transaction
/// ever spans two calls.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Articles ---

    /// All published articles, newest first, with author and category names
    /// joined in.
    async fn list_published_articles(&self) -> Result<Vec<ArticleView>, sqlx::Error>;

    /// Single article by id with the same joins. Published flag is not
    /// checked here; the detail endpoint serves drafts too.
    async fn find_article(&self, id: i64) -> Result<Option<ArticleView>, sqlx::Error>;

    /// Inserts a new article row. The slug arrives precomputed from the
    /// manager; no uniqueness pre-check is made, so a duplicate slug
    /// surfaces as the store's unique-constraint violation.
    async fn insert_article(
        &self,
        req: &CreateArticleRequest,
        slug: &str,
        author_id: i64,
    ) -> Result<(), sqlx::Error>;

    /// Applies a partial update covering exactly the present fields.
    /// Callers must not pass an empty change set. Returns rows affected.
    async fn update_article(
        &self,
        id: i64,
        changes: &UpdateArticleRequest,
    ) -> Result<u64, sqlx::Error>;

    /// Deletes by id, returning rows affected. A zero-row delete is rolled
    /// back rather than committed.
    async fn delete_article(&self, id: i64) -> Result<u64, sqlx::Error>;

    // --- Users ---

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    /// Inserts the lazily-provisioned admin row and returns its id.
    async fn insert_admin_user(&self, email: &str) -> Result<i64, sqlx::Error>;

    // --- Contact & Newsletter ---

    async fn insert_contact_message(&self, form: &ContactForm) -> Result<(), sqlx::Error>;

    /// Idempotent insert-if-absent. Returns true when a new row was
    /// inserted, false when the email was already subscribed; duplicates are
    /// handled by the store, not by error-driven control flow.
    async fn insert_subscriber_if_absent(&self, email: &str) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state and into each manager's constructor.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// The joined projection shared by the list and detail queries. COALESCE
// falls back to the username when the author never set a display name.
const ARTICLE_VIEW_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.excerpt, p.content, p.created_at, p.cover_image_url,
           COALESCE(u.full_name, u.username) AS author_name,
           c.name AS category_name
    FROM posts p
    LEFT JOIN users u ON p.user_id = u.id
    LEFT JOIN categories c ON p.category_id = c.id
"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_published_articles(&self) -> Result<Vec<ArticleView>, sqlx::Error> {
        let query = format!(
            "{ARTICLE_VIEW_COLUMNS} WHERE p.is_published = TRUE ORDER BY p.created_at DESC"
        );

        sqlx::query_as::<_, ArticleView>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_article(&self, id: i64) -> Result<Option<ArticleView>, sqlx::Error> {
        let query = format!("{ARTICLE_VIEW_COLUMNS} WHERE p.id = $1");

        sqlx::query_as::<_, ArticleView>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_article(
        &self,
        req: &CreateArticleRequest,
        slug: &str,
        author_id: i64,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts
                (user_id, category_id, title, slug, excerpt, content, cover_image_url, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(author_id)
        .bind(req.category_id)
        .bind(&req.title)
        .bind(slug)
        .bind(&req.excerpt)
        .bind(&req.content)
        .bind(&req.cover_image_url)
        .bind(req.is_published)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Builds one parameterized UPDATE from only the fields present in the
    /// change set. Values travel through bind parameters, never through
    /// string concatenation.
    async fn update_article(
        &self,
        id: i64,
        changes: &UpdateArticleRequest,
    ) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE posts SET ");
        let mut assignments = builder.separated(", ");

        if let Some(title) = &changes.title {
            assignments.push("title = ");
            assignments.push_bind_unseparated(title.as_str());
        }
        if let Some(excerpt) = &changes.excerpt {
            assignments.push("excerpt = ");
            assignments.push_bind_unseparated(excerpt.as_str());
        }
        if let Some(content) = &changes.content {
            assignments.push("content = ");
            assignments.push_bind_unseparated(content.as_str());
        }
        if let Some(category_id) = changes.category_id {
            assignments.push("category_id = ");
            assignments.push_bind_unseparated(category_id);
        }
        if let Some(cover_image_url) = &changes.cover_image_url {
            assignments.push("cover_image_url = ");
            assignments.push_bind_unseparated(cover_image_url.as_str());
        }
        if let Some(is_published) = changes.is_published {
            assignments.push("is_published = ");
            assignments.push_bind_unseparated(is_published);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn delete_article(&self, id: i64) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
        }

        Ok(result.rows_affected())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_admin_user(&self, email: &str) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role)
            VALUES ('admin', $1, 'env_managed', 'Super Admin', 'admin')
            RETURNING id
            "#,
        )
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(id)
    }

    async fn insert_contact_message(&self, form: &ContactForm) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO contacts (first_name, last_name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&form.email)
        .bind(&form.subject)
        .bind(&form.message)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    async fn insert_subscriber_if_absent(&self, email: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("INSERT INTO subscribers (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
                .bind(email)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
