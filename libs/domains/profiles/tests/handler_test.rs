//! Handler tests for the Profiles domain
//!
//! Routers are driven with `oneshot` against the in-memory repository and the
//! local hashing embedder; the caller is injected as JWT claims.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_embeddings::HashingProvider;
use domain_profiles::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{TestDataBuilder, as_user};
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn service() -> ProfileService<InMemoryProfileRepository> {
    ProfileService::new(
        InMemoryProfileRepository::new(),
        Arc::new(HashingProvider::default()),
    )
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_get_profile_requires_principal() {
    let app = handlers::router(service());

    let response = app.oneshot(get("/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_creates_blank_profile() {
    let builder = TestDataBuilder::from_test_name("handler_get_profile");
    let user_id = builder.user_id();
    let app = handlers::router(service()).layer(as_user(user_id));

    let response = app.oneshot(get("/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view: Value = json_body(response.into_body()).await;
    assert_eq!(view["user_id"], user_id.to_string());
    assert_eq!(view["name"], "");
    assert_eq!(view["hobbies"], "");
    assert_eq!(view["unread_notification_count"], 0);
}

#[tokio::test]
async fn test_put_profile_round_trips_fields_and_core_text() {
    let builder = TestDataBuilder::from_test_name("handler_put_profile");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/profile",
            json!({
                "name": builder.name("member", "ada"),
                "dorm": "West",
                "hobbies": "robotics club",
                "aspirations": "build robots"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/profile/vectors")).await.unwrap();
    let list: Value = json_body(response.into_body()).await;
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["attribute_key"], "hobbies");
    assert_eq!(items[0]["is_core"], true);
    assert!(items[0].get("embedding").is_none());
}

#[tokio::test]
async fn test_post_vectors_reports_unchanged_keys() {
    let builder = TestDataBuilder::from_test_name("handler_post_vectors");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));
    let body = json!({ "items": [{ "key": "clubs", "text": "chess club" }] });

    let first: UpsertReport = json_body(
        app.clone()
            .oneshot(json_request("POST", "/profile/vectors", body.clone()))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(first.embedded, vec!["clubs"]);

    let second: UpsertReport = json_body(
        app.oneshot(json_request("POST", "/profile/vectors", body))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert!(second.embedded.is_empty());
    assert_eq!(second.unchanged, vec!["clubs"]);
}

#[tokio::test]
async fn test_post_vectors_over_capacity_is_422() {
    let builder = TestDataBuilder::from_test_name("handler_capacity");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    let items: Vec<Value> = CATALOG
        .iter()
        .take(16)
        .map(|def| json!({ "key": def.key, "text": format!("about {}", def.key) }))
        .collect();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/profile/vectors", json!({ "items": items })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "CAPACITY_EXCEEDED");

    let response = app.oneshot(get("/profile/vectors")).await.unwrap();
    let list: Value = json_body(response.into_body()).await;
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_core_key_is_403() {
    let builder = TestDataBuilder::from_test_name("handler_delete_core");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    let request = Request::builder()
        .method("DELETE")
        .uri("/profile/vectors/hobbies")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "CORE_KEY_PROTECTED");
}

#[tokio::test]
async fn test_delete_extension_key_is_204() {
    let builder = TestDataBuilder::from_test_name("handler_delete_extension");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    app.clone()
        .oneshot(json_request(
            "POST",
            "/profile/vectors",
            json!({ "items": [{ "key": "music", "text": "jazz piano" }] }),
        ))
        .await
        .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri("/profile/vectors/music")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_key_is_400() {
    let builder = TestDataBuilder::from_test_name("handler_unknown_key");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/profile/vectors",
            json!({ "items": [{ "key": "shoe_size", "text": "44" }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_and_top() {
    let builder = TestDataBuilder::from_test_name("handler_catalog_top");
    let app = handlers::router(service()).layer(as_user(builder.user_id()));

    let response = app.clone().oneshot(get("/profile/catalog")).await.unwrap();
    let catalog: Vec<AttributeInfo> = json_body(response.into_body()).await;
    assert_eq!(catalog.len(), CATALOG.len());

    // Reading the profile creates it, so the leaderboard has one row
    app.clone().oneshot(get("/profile")).await.unwrap();
    let response = app.oneshot(get("/profiles/top?limit=5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let top: Value = json_body(response.into_body()).await;
    assert_eq!(top["items"].as_array().unwrap().len(), 1);
    assert_eq!(top["items"][0]["search_count"], 0);
}
