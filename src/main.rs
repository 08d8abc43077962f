use std::sync::Arc;

use actix::Actor;
use actix_web::{web, App, HttpServer};
use tracing::info;

use overdrive::config::ServerConfig;
use overdrive::services::lobby::Lobby;
use overdrive::services::manager::{MatchManager, MatchRegistry};
use overdrive::state::AppState;
use overdrive::{catalog, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Invalid configuration: {err}");
        std::process::exit(1);
    });
    telemetry::init_tracing(&config.log);

    let loaded = catalog::load_from_path(&config.catalog_path).unwrap_or_else(|err| {
        eprintln!("Cannot load card catalog: {err}");
        std::process::exit(1);
    });
    catalog::init_global(loaded).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });
    let catalog = match catalog::global() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let registry = Arc::new(MatchRegistry::new());
    let manager =
        MatchManager::new(registry.clone(), catalog.clone(), config.game.clone()).start();
    let lobby = Lobby::new(
        config.lobby.clone(),
        manager.recipient(),
        registry.clone(),
    )
    .start();
    let app_state = AppState::new(lobby, registry);

    info!(port = config.port, "Starting overdrive server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(overdrive::routes::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
