mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MongoDB, MongoStore};
use crate::services::RecordService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().unwrap_or_else(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::process::exit(1);
    });

    log::info!("🚀 Starting resort user service...");
    log::info!("📊 Database: {}", config.database_name);

    // A store we cannot reach at startup is fatal
    let db = MongoDB::connect(&config.database_url, &config.database_name)
        .await
        .unwrap_or_else(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        });
    log::info!("✅ MongoDB connected successfully");

    db.ensure_indexes(&config.users_collection).await;

    let store = MongoStore::new(&db, &config.users_collection, &config.resorts_collection);
    let service = web::Data::new(RecordService::new(Arc::new(store)));

    let (host, port) = config.bind_addr();
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(api::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    log::info!("🛑 Server stopped, closing MongoDB client");
    db.client().clone().shutdown().await;

    Ok(())
}
