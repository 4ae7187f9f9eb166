use actix_web::{web, HttpResponse, ResponseError};

use crate::models::{
    CreateUserRequest, CreateUserResponse, ErrorResponse, MessageResponse, UpdateInfoRequest,
    UpdateRoleRequest, UserQuery,
};
use crate::services::RecordService;
use crate::utils::AppError;

/// Logs a failed request at a level matching its cause and builds the response.
pub(crate) fn failure(context: &str, err: AppError) -> HttpResponse {
    match &err {
        AppError::Store(_) => log::error!("❌ {}: {}", context, err),
        _ => log::warn!("⚠️ {}: {}", context, err),
    }
    err.error_response()
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Name or email missing", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_user(
    service: web::Data<RecordService>,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /users - email: {}", email);

    match service.create_user(request.into_inner()).await {
        Ok(user_id) => HttpResponse::Created().json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user_id,
        }),
        Err(e) => failure("Error creating user", e),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(UserQuery),
    responses(
        (status = 200, description = "User record", body = Object),
        (status = 400, description = "Missing email parameter", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    service: web::Data<RecordService>,
    query: web::Query<UserQuery>,
) -> HttpResponse {
    log::info!("🔍 GET /users - email: {}", query.email.as_deref().unwrap_or("N/A"));

    match service.get_user(query.email.as_deref()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => failure("Error fetching user", e),
    }
}

#[utoipa::path(
    get,
    path = "/all-users",
    tag = "Users",
    responses(
        (status = 200, description = "All user records", body = [Object]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_users(service: web::Data<RecordService>) -> HttpResponse {
    log::info!("📋 GET /all-users");

    match service.list_users().await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => failure("Error fetching all user data", e),
    }
}

#[utoipa::path(
    patch,
    path = "/update-user",
    tag = "Users",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found or unchanged", body = ErrorResponse)
    )
)]
pub async fn update_user_role(
    service: web::Data<RecordService>,
    request: web::Json<UpdateRoleRequest>,
) -> HttpResponse {
    log::info!("🔧 PATCH /update-user - email: {}", request.email.as_deref().unwrap_or("N/A"));

    match service.update_user_role(request.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            success: true,
            message: "User role updated successfully".to_string(),
        }),
        Err(e) => failure("Error updating user role", e),
    }
}

#[utoipa::path(
    patch,
    path = "/update-user-info",
    tag = "Users",
    request_body = UpdateInfoRequest,
    responses(
        (status = 200, description = "User information updated", body = MessageResponse),
        (status = 400, description = "Missing email or no fields", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user_info(
    service: web::Data<RecordService>,
    request: web::Json<UpdateInfoRequest>,
) -> HttpResponse {
    log::info!(
        "🔧 PATCH /update-user-info - email: {}",
        request.email.as_deref().unwrap_or("N/A")
    );

    match service.update_user_info(request.into_inner()).await {
        Ok(modified) => {
            let message = if modified == 0 {
                "User information already up to date"
            } else {
                "User information updated successfully"
            };
            HttpResponse::Ok().json(MessageResponse {
                success: true,
                message: message.to_string(),
            })
        }
        Err(e) => failure("Error updating user info", e),
    }
}
