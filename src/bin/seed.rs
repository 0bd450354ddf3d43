use verdant_vistas::{
    config::AppConfig,
    db,
    managers::derive_slug,
    models::Category,
    repository::{PostgresRepository, Repository},
};

/// One-shot seeding utility: creates the schema if needed, provisions the
/// stock categories, and (when ADMIN_EMAIL is configured) the admin user
/// row. Every step is idempotent, so re-running is safe.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::load();

    let pool = db::connect(&config.db_url)
        .await
        .expect("Failed to connect to Postgres. Check DATABASE_URL.");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations.");

    tracing::info!("Seeding database...");

    // Stock categories matching the frontend's filters.
    let categories = ["Articles", "Poems", "Image posts", "Stories"];

    for name in categories {
        let slug = derive_slug(name);

        let inserted =
            sqlx::query("INSERT INTO categories (name, slug) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING")
                .bind(name)
                .bind(&slug)
                .execute(&pool)
                .await
                .expect("Failed to seed category");

        if inserted.rows_affected() > 0 {
            tracing::info!("Created category: {}", name);
        }
    }

    let categories: Vec<Category> =
        sqlx::query_as("SELECT id, name, slug FROM categories ORDER BY id")
            .fetch_all(&pool)
            .await
            .expect("Failed to list categories");
    tracing::info!("Categories synced ({} total)", categories.len());

    // Admin user, so login works before the lazy provisioning path ever runs.
    // Skipped when ADMIN_EMAIL is not configured explicitly.
    match std::env::var("ADMIN_EMAIL") {
        Ok(admin_email) => {
            let repo = PostgresRepository::new(pool);

            match repo
                .find_user_by_email(&admin_email)
                .await
                .expect("Failed to look up admin user")
            {
                Some(user) => tracing::info!("Admin user already exists (id {})", user.id),
                None => {
                    let id = repo
                        .insert_admin_user(&admin_email)
                        .await
                        .expect("Failed to create admin user");
                    tracing::info!("Admin user created (id {})", id);
                }
            }
        }
        Err(_) => tracing::warn!("ADMIN_EMAIL not set, skipping admin creation"),
    }

    tracing::info!("Database seeded successfully");
}
