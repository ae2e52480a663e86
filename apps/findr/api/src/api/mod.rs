use axum::Router;
use axum_helpers::jwt_auth_middleware;
use domain_messaging::{MessagingService, PgMessagingRepository};
use domain_notifications::{NotificationService, PgNotificationRepository};
use domain_profiles::{PgProfileRepository, ProfileService};
use domain_search::SearchService;
use std::sync::Arc;

pub mod health;

use crate::state::AppState;

/// API routes without the `/api` prefix, which `create_router` adds.
///
/// Every route requires a bearer JWT. Profiles double as the directory for
/// search and messaging; notifications double as the search fan-out.
pub fn routes(state: &AppState) -> Router {
    let profiles = ProfileService::new(
        PgProfileRepository::new(state.db.clone()),
        Arc::clone(&state.embedder),
    );
    let notifications = NotificationService::new(PgNotificationRepository::new(state.db.clone()));
    let messaging = MessagingService::new(
        PgMessagingRepository::new(state.db.clone()),
        Arc::new(profiles.clone()),
    );
    let search = SearchService::new(
        Arc::clone(&state.embedder),
        Arc::new(profiles.clone()),
        Arc::new(notifications.clone()),
    );

    Router::new()
        .merge(domain_profiles::handlers::router(profiles))
        .merge(domain_search::handlers::router(search))
        .merge(domain_notifications::handlers::router(notifications))
        .merge(domain_messaging::handlers::router(messaging))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_auth.clone(),
            jwt_auth_middleware,
        ))
}

/// `/ready` with a real database probe. Sits outside the JWT layer.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
