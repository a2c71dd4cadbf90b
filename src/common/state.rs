// Application state shared across all modules

use sqlx::SqlitePool;

use super::config::AppConfig;

/// Application state containing the database pool and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
}

#[cfg(test)]
impl AppState {
    /// Migrated in-memory database on a single long-lived connection
    pub async fn for_tests() -> std::sync::Arc<AppState> {
        use sqlx::sqlite::SqlitePoolOptions;

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        super::migrations::run_migrations(&db, false).await.unwrap();

        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            reset_db: false,
        };

        std::sync::Arc::new(AppState { db, config })
    }
}
