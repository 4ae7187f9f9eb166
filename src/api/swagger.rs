use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resort User Service API",
        version = "1.0.0",
        description = "User records and the resort catalog.\n\nUsers are keyed by email; resorts are read only."
    ),
    paths(
        // Health
        crate::api::health::index,
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::list_users,
        crate::api::users::update_user_role,
        crate::api::users::update_user_info,

        // Resorts
        crate::api::resorts::list_resorts,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::CreateUserRequest,
            crate::models::UpdateRoleRequest,
            crate::models::UpdateInfoRequest,
            crate::models::CreateUserResponse,
            crate::models::MessageResponse,
            crate::models::ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database health."),
        (name = "Users", description = "Create, fetch and update user records."),
        (name = "Resorts", description = "Resort catalog, loaded externally."),
    )
)]
pub struct ApiDoc;
