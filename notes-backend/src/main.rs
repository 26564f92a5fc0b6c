use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod notes;

use config::Config;
use notes::NoteStore;

pub struct AppState {
    /// Sole owner of the backing notes file
    pub store: Arc<NoteStore>,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notes backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();

    // The store file must exist before the first request is served
    let store = match NoteStore::open(config.notes_file.clone()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to initialize note store: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    if !config.upload_form_path().exists() {
        log::warn!(
            "Upload form not found at {:?}; /UploadForm.html will answer 404",
            config.upload_form_path()
        );
    }

    let host = config.host.clone();
    let port = config.port;
    let max_body_bytes = config.max_body_bytes;

    log::info!("Serving notes from {:?} on {}:{}", store.path(), host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::clone(&store),
                config: config.clone(),
            }))
            .app_data(web::FormConfig::default().limit(max_body_bytes))
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .wrap(Logger::default())
            .configure(controllers::health::config_routes)
            .configure(controllers::index::config)
            .configure(controllers::notes::config)
    })
    .bind((host.as_str(), port))?
    .run();

    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
