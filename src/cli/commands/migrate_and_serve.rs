use anyhow::Result;
use tracing::{error, info, trace};

use super::initdb::apply_migrations;
use super::serve::run_server;
use crate::config::initialize_app_state_with_url;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let state = match initialize_app_state_with_url(database_url).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    // Same pool for migrations and serving, so in-memory databases keep their schema.
    apply_migrations(&state.db).await?;

    run_server(state, bind_address).await
}
