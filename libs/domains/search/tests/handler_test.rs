//! Handler tests for the Search domain, wired to in-memory profiles and
//! notifications.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_embeddings::{EmbeddingProvider, HashingProvider};
use domain_notifications::{InMemoryNotificationRepository, NotificationService};
use domain_profiles::{InMemoryProfileRepository, ProfileService, VectorItem};
use domain_search::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{TestDataBuilder, as_user};
use tower::ServiceExt;

struct App {
    profiles: ProfileService<InMemoryProfileRepository>,
    notifications: NotificationService<InMemoryNotificationRepository>,
    search: SearchService,
}

fn app() -> App {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingProvider::default());
    let profiles = ProfileService::new(InMemoryProfileRepository::new(), embedder.clone());
    let notifications = NotificationService::new(InMemoryNotificationRepository::new());
    let search = SearchService::new(
        embedder,
        Arc::new(profiles.clone()),
        Arc::new(notifications.clone()),
    );
    App {
        profiles,
        notifications,
        search,
    }
}

fn post_search(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/search")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_search_requires_principal() {
    let router = handlers::router(app().search);
    let response = router
        .oneshot(post_search(json!({ "query": "robotics" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_query_is_400() {
    let builder = TestDataBuilder::from_test_name("search_blank");
    let router = handlers::router(app().search).layer(as_user(builder.user_id()));

    let response = router
        .oneshot(post_search(json!({ "query": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_returns_explained_matches_and_notifies() {
    let builder = TestDataBuilder::from_test_name("search_robotics");
    let (searcher, p1, p2) = (builder.user_n(1), builder.user_n(2), builder.user_n(3));
    let app = app();

    app.profiles
        .upsert_many(
            p1,
            vec![VectorItem {
                key: "hobbies".into(),
                text: "robotics club".into(),
            }],
        )
        .await
        .unwrap();
    app.profiles
        .upsert_many(
            p2,
            vec![VectorItem {
                key: "aspirations".into(),
                text: "build robots".into(),
            }],
        )
        .await
        .unwrap();

    let router = handlers::router(app.search).layer(as_user(searcher));
    let response = router
        .oneshot(post_search(json!({ "query": "robotics", "limit": 5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.results.len(), 2);
    assert_eq!(body.results[0].user_id, p1);
    assert_eq!(body.results[0].top_chunk.content, "hobbies");
    assert_eq!(body.results[0].top_chunk.content_text, "robotics club");
    assert_eq!(body.results[1].top_chunk.content, "aspirations");

    let list = app.notifications.list(p2, None).await.unwrap();
    assert_eq!(list.unread_count, 1);
    assert_eq!(list.items[0].triggering_user_id, searcher);
}
