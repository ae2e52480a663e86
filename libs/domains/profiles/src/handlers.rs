use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use axum_helpers::{
    CurrentUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, CapacityExceededResponse, ForbiddenResponse,
        InternalServerErrorResponse, ServiceUnavailableResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::ProfileResult;
use crate::models::{
    AttributeInfo, Profile, ProfileSummary, ProfileSummaryList, ProfileUpdate, ProfileView,
    TopQuery, UpsertReport, UpsertVectors, VectorEntry, VectorItem, VectorList,
};
use crate::repository::ProfileRepository;
use crate::service::ProfileService;

/// OpenAPI documentation for the Profiles API
#[derive(OpenApi)]
#[openapi(
    paths(
        get_profile,
        update_profile,
        list_vectors,
        upsert_vectors,
        remove_vector,
        catalog,
        top_profiles,
    ),
    components(
        schemas(
            Profile,
            ProfileView,
            ProfileUpdate,
            VectorEntry,
            VectorItem,
            VectorList,
            UpsertVectors,
            UpsertReport,
            AttributeInfo,
            ProfileSummary,
            ProfileSummaryList
        ),
        responses(
            BadRequestValidationResponse,
            CapacityExceededResponse,
            ForbiddenResponse,
            UnauthorizedResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::profile::Model::TAG, description = "Profiles and searchable attributes")
    )
)]
pub struct ApiDoc;

/// Create the profile router. Paths are relative to the `/api` nest.
pub fn router<R: ProfileRepository + 'static>(service: ProfileService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/vectors", get(list_vectors).post(upsert_vectors))
        .route("/profile/vectors/{key}", delete(remove_vector))
        .route("/profile/catalog", get(catalog))
        .route("/profiles/top", get(top_profiles))
        .with_state(shared_service)
}

/// Get the caller's profile, creating it on first access
#[utoipa::path(
    get,
    path = "/profile",
    tag = entity::profile::Model::TAG,
    responses(
        (status = 200, description = "Caller's profile", body = ProfileView),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_profile<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    user: CurrentUser,
) -> ProfileResult<Json<ProfileView>> {
    let view = service.get_view(user.id()).await?;
    Ok(Json(view))
}

/// Update display fields and core attributes
#[utoipa::path(
    put,
    path = "/profile",
    tag = entity::profile::Model::TAG,
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile saved", body = ProfileView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = CapacityExceededResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_profile<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<ProfileUpdate>,
) -> ProfileResult<Json<ProfileView>> {
    let view = service.update_profile(user.id(), input).await?;
    Ok(Json(view))
}

/// List the caller's attributes
#[utoipa::path(
    get,
    path = "/profile/vectors",
    tag = entity::profile::Model::TAG,
    responses(
        (status = 200, description = "Attributes in insertion order", body = VectorList),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_vectors<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    user: CurrentUser,
) -> ProfileResult<Json<VectorList>> {
    let items = service.list_by_user(user.id()).await?;
    Ok(Json(VectorList { items }))
}

/// Add or update attributes; unchanged text is not re-embedded
#[utoipa::path(
    post,
    path = "/profile/vectors",
    tag = entity::profile::Model::TAG,
    request_body = UpsertVectors,
    responses(
        (status = 200, description = "Attributes saved", body = UpsertReport),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = CapacityExceededResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_vectors<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<UpsertVectors>,
) -> ProfileResult<Json<UpsertReport>> {
    let report = service.upsert_many(user.id(), input.items).await?;
    Ok(Json(report))
}

/// Remove an extension attribute
#[utoipa::path(
    delete,
    path = "/profile/vectors/{key}",
    tag = entity::profile::Model::TAG,
    params(
        ("key" = String, Path, description = "Attribute key")
    ),
    responses(
        (status = 204, description = "Attribute removed"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_vector<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    user: CurrentUser,
    Path(key): Path<String>,
) -> ProfileResult<impl IntoResponse> {
    service.remove(user.id(), &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attribute catalog
#[utoipa::path(
    get,
    path = "/profile/catalog",
    tag = entity::profile::Model::TAG,
    responses(
        (status = 200, description = "Every attribute a profile may hold", body = Vec<AttributeInfo>)
    )
)]
async fn catalog<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
) -> Json<Vec<AttributeInfo>> {
    Json(service.catalog())
}

/// Most-searched profiles
#[utoipa::path(
    get,
    path = "/profiles/top",
    tag = entity::profile::Model::TAG,
    params(TopQuery),
    responses(
        (status = 200, description = "Leaderboard", body = ProfileSummaryList),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn top_profiles<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    Query(query): Query<TopQuery>,
) -> ProfileResult<Json<ProfileSummaryList>> {
    let items = service.top(query.limit).await?;
    Ok(Json(ProfileSummaryList { items }))
}
