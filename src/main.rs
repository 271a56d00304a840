mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::middleware::AuthMiddleware;
use crate::services::{StripeGateway, TokenKeys};
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Configuration error: {}", e);
        Error::new(ErrorKind::Other, e.to_string())
    })?;

    log::info!("🚀 Starting Creative Snap service...");
    log::info!("📊 Database: {}", config.database_name);

    // Initialize MongoDB connection
    let db = MongoDB::connect(&config.database_url, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            Error::new(ErrorKind::Other, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let gateway = StripeGateway::new(
        config.payment_secret_key.clone(),
        config.stripe_api_base.clone(),
        config.payment_currency.clone(),
    )
    .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    let tokens = Arc::new(TokenKeys::new(&config.access_key));
    let state = web::Data::new(AppState::new(
        Arc::new(db.clone()),
        Arc::new(gateway),
        tokens.clone(),
    ));
    let auth = AuthMiddleware::new(tokens);

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    // Start HTTP server
    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();
        let auth = auth.clone();

        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(move |cfg| api::configure(cfg, auth))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("🛑 Server stopped, closing MongoDB connections");
    db.shutdown().await;

    Ok(())
}
