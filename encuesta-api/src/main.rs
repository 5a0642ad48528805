mod config;
mod handlers;
mod models;
mod uploads;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use config::ApiConfig;
use encuesta_core::Database;
use std::sync::Arc;
use tracing::info;
use uploads::{FsImageStore, ImageStore};

#[derive(Parser, Debug)]
#[command(name = "encuesta-api", about = "Municipal social-survey intake service")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (config, config_path) = ApiConfig::load_from(args.config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    info!("Loaded configuration from {}", config_path.display());

    let database = Arc::new(
        Database::new(&config.database.path)
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let images: Arc<dyn ImageStore> = Arc::new(FsImageStore::new(config.uploads_dir())?);

    info!(
        "Starting encuesta-api server at http://{}:{}",
        config.server.host, config.server.port
    );

    let bind_addr = (config.server.host.clone(), config.server.port);
    HttpServer::new(move || {
        let cors = match &config.cors {
            Some(cors_config) => cors_config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(images.clone()))
            .service(handlers::survey::get_question)
            .service(handlers::survey::submit_answer)
            .service(handlers::survey::get_progress)
            .service(handlers::survey::get_coincidences)
            .service(handlers::beneficiaries::register_beneficiary)
            .service(handlers::beneficiaries::list_beneficiaries)
            .service(handlers::questions::create_question)
            .service(handlers::questions::create_choice)
            .service(handlers::export::export_answers)
    })
    .bind(bind_addr)?
    .run()
    .await
}
