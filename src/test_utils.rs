#[cfg(test)]
pub mod test_utils {
    use crate::config::Settings;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use tracing_subscriber::EnvFilter;

    /// Create an in-memory SQLite database with the schema applied
    pub async fn setup_test_db() -> DatabaseConnection {
        init_test_tracing();

        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .expect("Failed to enable foreign keys");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        AppState {
            db: setup_test_db().await,
            settings: Settings::default(),
        }
    }

    /// Initialize tracing for tests.
    ///
    /// Output goes through the test writer so it is only shown for failing
    /// tests. The level comes from RUST_LOG and defaults to WARN.
    fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        create_router(setup_test_app_state().await)
    }
}
