use dotenvy::dotenv;
use soda_vendor::{
    api::{self, AppState},
    chat::KeywordExtractor,
    config::{app, database},
    core::item,
    errors::{Error, Result},
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = app::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Connect and make sure the tables exist
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed initial stock (if configured)
    let seeded = item::seed_items(&db, &app_config.items)
        .await
        .inspect_err(|e| error!("Failed to seed initial items: {}", e))?;
    info!("Seeded {seeded} initial item(s).");

    // 6. Serve
    let state = AppState::new(db, Arc::new(KeywordExtractor::new()));
    let app = api::router(state, &app_config.server.cors_origins)?;

    let host = app_config
        .server
        .host
        .parse::<IpAddr>()
        .map_err(|e| Error::Config {
            message: format!("Invalid host {:?}: {e}", app_config.server.host),
        })?;
    let addr = SocketAddr::new(host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
