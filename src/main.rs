use tracing::{error, info};

use blogsite::mail::transport_from_config;
use blogsite::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = blogsite::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        blogsite::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("{} - {}", config.site.name, config.site.description);
    info!(
        "Server configured on {}:{} (timezone {})",
        config.server.host, config.server.port, config.server.timezone
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let mail = match transport_from_config(&config.mail) {
        Ok(mail) => mail,
        Err(e) => {
            error!("Failed to set up mail transport: {}", e);
            std::process::exit(1);
        }
    };
    info!("Mail transport: {}", mail.name());

    let server = match WebServer::new(config, db, mail) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
