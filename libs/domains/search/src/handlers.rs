use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    CurrentUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SearchResult;
use crate::models::{SearchMatch, SearchRequest, SearchResponse, TopChunk};
use crate::service::SearchService;

const TAG: &str = "search";

/// OpenAPI documentation for the Search API
#[derive(OpenApi)]
#[openapi(
    paths(search),
    components(
        schemas(SearchRequest, SearchResponse, SearchMatch, TopChunk),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Semantic people search")
    )
)]
pub struct ApiDoc;

/// Create the search router. Paths are relative to the `/api` nest.
pub fn router(service: SearchService) -> Router {
    Router::new()
        .route("/search", post(search))
        .with_state(Arc::new(service))
}

/// Rank profiles against a free-text query
///
/// Every returned profile receives a notification; that side effect never
/// affects the response.
#[utoipa::path(
    post,
    path = "/search",
    tag = TAG,
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked matches, best first", body = SearchResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search(
    State(service): State<Arc<SearchService>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<SearchRequest>,
) -> SearchResult<Json<SearchResponse>> {
    let response = service.search(user.id(), &input.query, input.limit).await?;
    Ok(Json(response))
}
