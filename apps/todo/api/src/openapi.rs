use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "API for managing projects and their tasks, with automatic closing of overdue tasks"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/projects", api = domain_todo::handlers::projects::ApiDoc),
        (path = "/projects", api = domain_todo::handlers::tasks::ApiDoc)
    )
)]
pub struct ApiDoc;
