use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Document metadata and shared components; domain paths are merged in below.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "findr API",
        version = "0.1.0",
        description = "Semantic people search, notifications and direct messages for a closed community"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    modifiers(&BearerAuth),
    security(
        ("bearer" = [])
    )
)]
struct BaseDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Combined OpenAPI document served at `/api-docs/openapi.json`.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        BaseDoc::openapi()
            .merge_from(domain_profiles::handlers::ApiDoc::openapi())
            .merge_from(domain_search::handlers::ApiDoc::openapi())
            .merge_from(domain_notifications::handlers::ApiDoc::openapi())
            .merge_from(domain_messaging::handlers::ApiDoc::openapi())
    }
}
