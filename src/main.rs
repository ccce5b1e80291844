mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::instagram::InstagramClient;
use services::reviews::PlacesClient;
use services::store::{JsonFileStore, MemoryStore, PgStore, SnippetRepository};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env();

    let repo: Arc<dyn SnippetRepository> = match config.database_url.as_deref() {
        _ if config.snippet_store_path.as_os_str() == config::MEMORY_STORE_PATH => {
            tracing::warn!("snippet store: in-memory; snippets are lost on exit");
            Arc::new(MemoryStore::new())
        }
        Some(url) => {
            let pool = db::init_pool(url).await.expect("database init failed");
            tracing::info!("snippet store: postgres");
            Arc::new(PgStore::new(pool))
        }
        None => {
            let store = JsonFileStore::open(&config.snippet_store_path)
                .await
                .expect("snippet store load failed");
            tracing::info!(path = %store.path().display(), "snippet store: json file");
            Arc::new(store)
        }
    };

    if config.places_api_key.is_none() {
        tracing::warn!("GOOGLE_PLACES_API_KEY not set; review lookups will return demo data");
    }
    let places = PlacesClient::from_config(&config).expect("places client init failed");
    let instagram = InstagramClient::from_config(&config).expect("instagram client init failed");

    let state = state::AppState::new(repo, config.autosave_debounce(), Arc::new(places), Arc::new(instagram));
    let autosave = state.autosave.clone();

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "widgethub listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    autosave.shutdown();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
