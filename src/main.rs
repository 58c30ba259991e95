mod api;
mod blockchain;
mod config;

use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let Config {
        host,
        port,
        difficulty,
    } = Config::from_env();

    info!("⛓️ Starting blockchain API at http://{host}:{port} (difficulty={difficulty})");

    // One chain per process, dropped on shutdown.
    let state = web::Data::new(AppState::new(difficulty));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
