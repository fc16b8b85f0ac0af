use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::get_config;

/// Build the database handle. The driver connects lazily, so this performs
/// no network I/O; a dead deployment only surfaces when an operation runs.
pub async fn init_db() -> Result<Database, mongodb::error::Error> {
    let config = get_config();

    let mut options = ClientOptions::parse(&config.database.uri).await?;
    options.app_name = Some(config.app_name.clone());
    options.connect_timeout = Some(Duration::from_secs(config.database.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(
        config.database.server_selection_timeout_secs,
    ));

    let client = Client::with_options(options)?;

    Ok(client.database(&config.database.name))
}

/// Health check: Ok(()) si el deployment responde al ping.
pub async fn health_check(db: &Database) -> Result<(), mongodb::error::Error> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
