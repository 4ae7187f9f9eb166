pub mod health;
pub mod resorts;
pub mod swagger;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::utils::AppError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ Rejected JSON body: {}", err);
    AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ Rejected query string: {}", err);
    AppError::Validation(format!("Invalid query string: {}", err)).into()
}

/// Registers every route plus the extractor configs that keep bad input on the
/// `{success, message}` error shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        // Health check
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health_check))
        // Users
        .route("/users", web::post().to(users::create_user))
        .route("/users", web::get().to(users::get_user))
        .route("/all-users", web::get().to(users::list_users))
        .route("/update-user", web::patch().to(users::update_user_role))
        .route("/update-user-info", web::patch().to(users::update_user_info))
        // Resorts (read only)
        .route("/all-resorts", web::get().to(resorts::list_resorts));
}
