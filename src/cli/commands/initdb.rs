use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, trace};

use crate::config::connect;

/// Apply every pending migration to an open connection.
pub async fn apply_migrations(db: &DatabaseConnection) -> Result<()> {
    info!("Running database migrations");
    trace!("Executing migration up command");
    if let Err(e) = Migrator::up(db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("All pending migrations have been applied");
    Ok(())
}

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    let db = match connect(database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e);
        }
    };

    apply_migrations(&db).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
