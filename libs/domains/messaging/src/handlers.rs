use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use axum_helpers::{
    CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::MessagingResult;
use crate::models::{
    ConversationList, ConversationSummary, EnsureConversation, EnsureResponse, HistoryQuery,
    Message, MessageList, MessageView, SendMessage,
};
use crate::repository::MessagingRepository;
use crate::service::MessagingService;

/// OpenAPI documentation for the direct messages API
#[derive(OpenApi)]
#[openapi(
    paths(
        ensure_conversation,
        list_conversations,
        history,
        send_message,
        stream_messages,
    ),
    components(
        schemas(
            EnsureConversation,
            EnsureResponse,
            ConversationSummary,
            ConversationList,
            Message,
            MessageView,
            MessageList,
            SendMessage
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::conversation::Model::TAG, description = "Direct messages")
    )
)]
pub struct ApiDoc;

/// Create the direct messages router. Paths are relative to the `/api` nest.
pub fn router<R: MessagingRepository + 'static>(service: MessagingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/dms/ensure", post(ensure_conversation))
        .route("/dms/conversations", get(list_conversations))
        .route(
            "/dms/{conversation_id}/messages",
            get(history).post(send_message),
        )
        .route("/dms/{conversation_id}/stream", get(stream_messages))
        .with_state(shared_service)
}

/// Get or create the conversation with another member
#[utoipa::path(
    post,
    path = "/dms/ensure",
    tag = entity::conversation::Model::TAG,
    request_body = EnsureConversation,
    responses(
        (status = 200, description = "Conversation id, same for both members", body = EnsureResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn ensure_conversation<R: MessagingRepository>(
    State(service): State<Arc<MessagingService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<EnsureConversation>,
) -> MessagingResult<Json<EnsureResponse>> {
    let conversation = service
        .ensure_conversation(user.id(), input.other_user_id)
        .await?;
    Ok(Json(EnsureResponse {
        conversation_id: conversation.id,
    }))
}

/// Conversations of the caller with the other member's card
#[utoipa::path(
    get,
    path = "/dms/conversations",
    tag = entity::conversation::Model::TAG,
    responses(
        (status = 200, description = "Conversations, newest first", body = ConversationList),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_conversations<R: MessagingRepository>(
    State(service): State<Arc<MessagingService<R>>>,
    user: CurrentUser,
) -> MessagingResult<Json<ConversationList>> {
    let items = service.list_conversations(user.id()).await?;
    Ok(Json(ConversationList { items }))
}

/// Message history, oldest first
#[utoipa::path(
    get,
    path = "/dms/{conversation_id}/messages",
    tag = entity::conversation::Model::TAG,
    params(
        ("conversation_id" = Uuid, Path, description = "Conversation ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Most recent messages in ascending order", body = MessageList),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn history<R: MessagingRepository>(
    State(service): State<Arc<MessagingService<R>>>,
    user: CurrentUser,
    UuidPath(conversation_id): UuidPath,
    Query(query): Query<HistoryQuery>,
) -> MessagingResult<Json<MessageList>> {
    let items = service
        .history(conversation_id, user.id(), query.limit)
        .await?;
    Ok(Json(MessageList { items }))
}

/// Send a message
#[utoipa::path(
    post,
    path = "/dms/{conversation_id}/messages",
    tag = entity::conversation::Model::TAG,
    params(
        ("conversation_id" = Uuid, Path, description = "Conversation ID")
    ),
    request_body = SendMessage,
    responses(
        (status = 201, description = "Message stored", body = MessageView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_message<R: MessagingRepository>(
    State(service): State<Arc<MessagingService<R>>>,
    user: CurrentUser,
    UuidPath(conversation_id): UuidPath,
    ValidatedJson(input): ValidatedJson<SendMessage>,
) -> MessagingResult<(StatusCode, Json<MessageView>)> {
    let message = service.send(conversation_id, user.id(), input.text).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageView::for_viewer(message, user.id())),
    ))
}

/// Live feed of new messages (SSE)
///
/// Membership is checked before subscribing. Each insert arrives as a
/// `message` event; clients dedupe against their local list by id.
#[utoipa::path(
    get,
    path = "/dms/{conversation_id}/stream",
    tag = entity::conversation::Model::TAG,
    params(
        ("conversation_id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "SSE stream of messages"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn stream_messages<R: MessagingRepository + 'static>(
    State(service): State<Arc<MessagingService<R>>>,
    user: CurrentUser,
    UuidPath(conversation_id): UuidPath,
) -> MessagingResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let viewer = user.id();
    let mut subscription = service.subscribe(conversation_id, viewer).await?;

    let stream = async_stream::stream! {
        while let Some(message) = subscription.recv().await {
            let view = MessageView::for_viewer(message, viewer);
            match Event::default().event("message").id(view.message.id.to_string()).json_data(&view) {
                Ok(event) => yield Ok(event),
                Err(e) => {
                    tracing::warn!(conversation_id = %conversation_id, error = %e, "Failed to encode message");
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
