mod artifact;
mod classifier;
mod config;
mod decision;
mod loader;
mod pipeline;
mod routes;
mod screening;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use classifier::TractClassifier;
use config::ScreeningConfig;
use pipeline::Scanner;
use routes::configure_routes;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_MODEL_PATH: &str = "brain_tumor_model.onnx";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let screening_config = ScreeningConfig::load_or_default();
    log::info!("Screening gate mode: {:?}", screening_config.gate.mode);

    let model_path = PathBuf::from(
        env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string()),
    );
    let model_url = env::var("MODEL_URL").ok();

    if let Err(e) = artifact::ensure_model(&model_path, model_url.as_deref()).await {
        log::error!("Model bootstrap failed: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Model bootstrap failed: {}", e),
        ));
    }

    let classifier = match TractClassifier::from_path(&model_path) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("Failed to load model at startup: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Model loading failed: {}", e),
            ));
        }
    };
    let scanner = Scanner::new(Arc::new(classifier), screening_config.gate.mode);

    let port = env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(scanner.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
