use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cinema_booking::config::{Cli, Config};
use cinema_booking::http::{router, AppState};
use cinema_booking::{logging, seed, BookingStore};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(BookingStore::new());

    if let Some(seed_path) = &config.seed_path {
        log::info!("loading seed data from '{}'", seed_path.display());
        if let Err(e) = seed::load_from_file(&store, seed_path) {
            log::error!("failed to load seed data: {e}");
            return ExitCode::FAILURE;
        }
    }

    let app = router(AppState { store }).layer(tower_http::trace::TraceLayer::new_for_http());

    log::info!("listening on {}", config.bind_addr);
    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("failed to bind {}: {e}", config.bind_addr);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
