use actix_web::{web, HttpResponse};

use super::users::failure;
use crate::models::ErrorResponse;
use crate::services::RecordService;

#[utoipa::path(
    get,
    path = "/all-resorts",
    tag = "Resorts",
    responses(
        (status = 200, description = "All resort records", body = [Object]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_resorts(service: web::Data<RecordService>) -> HttpResponse {
    log::info!("📋 GET /all-resorts");

    match service.list_resorts().await {
        Ok(resorts) => {
            log::info!("✅ Listed {} resorts", resorts.len());
            HttpResponse::Ok().json(resorts)
        }
        Err(e) => failure("Error fetching all resort data", e),
    }
}
