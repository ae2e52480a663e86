use axum::{
    Json, Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use axum_helpers::{
    CurrentUser,
    errors::responses::{InternalServerErrorResponse, UnauthorizedResponse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::NotificationResult;
use crate::models::{ListQuery, Notification, NotificationList, ReadReceipt};
use crate::repository::NotificationRepository;
use crate::service::NotificationService;

/// OpenAPI documentation for the Notifications API
#[derive(OpenApi)]
#[openapi(
    paths(list_notifications, mark_read, stream_notifications),
    components(
        schemas(Notification, NotificationList, ReadReceipt),
        responses(UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = entity::notification::Model::TAG, description = "Search notifications")
    )
)]
pub struct ApiDoc;

/// Create the notifications router. Paths are relative to the `/api` nest.
pub fn router<R: NotificationRepository + 'static>(service: NotificationService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read", post(mark_read))
        .route("/notifications/stream", get(stream_notifications))
        .with_state(shared_service)
}

/// Newest notifications and the unread count
#[utoipa::path(
    get,
    path = "/notifications",
    tag = entity::notification::Model::TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = NotificationList),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_notifications<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> NotificationResult<Json<NotificationList>> {
    let list = service.list(user.id(), query.limit).await?;
    Ok(Json(list))
}

/// Mark everything up to now as seen
#[utoipa::path(
    post,
    path = "/notifications/read",
    tag = entity::notification::Model::TAG,
    responses(
        (status = 200, description = "Counter reset", body = ReadReceipt),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_read<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    user: CurrentUser,
) -> NotificationResult<Json<ReadReceipt>> {
    let receipt = service.mark_read(user.id()).await?;
    Ok(Json(receipt))
}

/// Live feed of new notifications (SSE)
///
/// Emits `unread` with the current counter, then one `notification` event per
/// insert addressed to the caller.
#[utoipa::path(
    get,
    path = "/notifications/stream",
    tag = entity::notification::Model::TAG,
    responses(
        (status = 200, description = "SSE stream of notifications"),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn stream_notifications<R: NotificationRepository + 'static>(
    State(service): State<Arc<NotificationService<R>>>,
    user: CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = user.id();
    // Subscribe before the first poll so nothing published after the
    // request is accepted can be missed.
    let mut subscription = service.subscribe(user_id).await;

    let stream = async_stream::stream! {
        match service.unread_count(user_id).await {
            Ok(count) => {
                yield Ok(Event::default()
                    .event("unread")
                    .data(count.to_string()));
            }
            Err(e) => {
                yield Ok(Event::default()
                    .event("error")
                    .data(e.to_string()));
            }
        }

        while let Some(notification) = subscription.recv().await {
            match Event::default().event("notification").json_data(&notification) {
                Ok(event) => yield Ok(event),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Failed to encode notification");
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
