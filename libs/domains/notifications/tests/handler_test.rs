//! Handler tests for the Notifications domain

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_notifications::*;
use http_body_util::BodyExt;
use std::time::Duration;
use test_utils::{TestDataBuilder, as_user};
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Next data frame of an SSE body as text
async fn next_chunk(body: &mut Body) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .expect("timed out waiting for SSE frame")
            .expect("stream ended")
            .unwrap();
        if let Ok(data) = frame.into_data() {
            return String::from_utf8(data.to_vec()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_list_requires_principal() {
    let service = NotificationService::new(InMemoryNotificationRepository::new());
    let app = handlers::router(service);

    let response = app.oneshot(get("/notifications")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_returns_items_and_unread_count() {
    let builder = TestDataBuilder::from_test_name("notif_list");
    let (me, searcher) = (builder.user_n(1), builder.user_n(2));
    let service = NotificationService::new(InMemoryNotificationRepository::new());

    for query in ["a", "b", "c", "d", "e", "f"] {
        service.fanout(searcher, vec![me], query.into()).await.unwrap();
    }

    let app = handlers::router(service).layer(as_user(me));

    let response = app.clone().oneshot(get("/notifications")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list: NotificationList = json_body(response.into_body()).await;
    assert_eq!(list.items.len(), 5);
    assert_eq!(list.items[0].query_text, "f");
    assert_eq!(list.unread_count, 6);

    let response = app.oneshot(get("/notifications?limit=2")).await.unwrap();
    let list: NotificationList = json_body(response.into_body()).await;
    assert_eq!(list.items.len(), 2);
}

#[tokio::test]
async fn test_mark_read_resets_counter() {
    let builder = TestDataBuilder::from_test_name("notif_read");
    let me = builder.user_id();
    let service = NotificationService::new(InMemoryNotificationRepository::new());
    service
        .fanout(builder.user_n(7), vec![me], "chess".into())
        .await
        .unwrap();

    let app = handlers::router(service.clone()).layer(as_user(me));

    let request = Request::builder()
        .method("POST")
        .uri("/notifications/read")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt: ReadReceipt = json_body(response.into_body()).await;
    assert_eq!(receipt.unread_count, 0);

    service
        .fanout(builder.user_n(7), vec![me], "chess".into())
        .await
        .unwrap();

    let response = app.oneshot(get("/notifications")).await.unwrap();
    let list: NotificationList = json_body(response.into_body()).await;
    assert_eq!(list.unread_count, 1);
    assert_eq!(list.items.len(), 2);
}

#[tokio::test]
async fn test_stream_delivers_unread_then_new_notifications() {
    let builder = TestDataBuilder::from_test_name("notif_stream");
    let (me, searcher) = (builder.user_n(1), builder.user_n(2));
    let service = NotificationService::new(InMemoryNotificationRepository::new());
    service.fanout(searcher, vec![me], "earlier".into()).await.unwrap();

    let app = handlers::router(service.clone()).layer(as_user(me));
    let response = app.oneshot(get("/notifications/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body();
    let first = next_chunk(&mut body).await;
    assert!(first.contains("event: unread"));
    assert!(first.contains("data: 1"));

    service
        .fanout(searcher, vec![me, builder.user_n(3)], "robotics".into())
        .await
        .unwrap();

    let second = next_chunk(&mut body).await;
    assert!(second.contains("event: notification"));
    assert!(second.contains("\"query_text\":\"robotics\""));
    assert!(second.contains(&me.to_string()));
}
