use std::sync::Arc;

use tracing::info;

use filedrop::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    filedrop::logging::init("info");

    info!("filedrop - Password-gated file drop");

    // Open the database
    let db = match Database::open(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {e}", config.database_url);
            std::process::exit(1);
        }
    };

    // Start the web server
    let server = match WebServer::new(&config, Arc::new(db)) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to create web server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("Web server error: {e}");
        std::process::exit(1);
    }
}
