//! Integration tests for PgMessagingRepository

use domain_embeddings::HashingProvider;
use domain_messaging::*;
use domain_profiles::{PgProfileRepository, ProfileService};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn service(db: &TestDatabase) -> MessagingService<PgMessagingRepository> {
    let profiles = ProfileService::new(
        PgProfileRepository::new(db.connection()),
        Arc::new(HashingProvider::default()),
    );
    MessagingService::new(PgMessagingRepository::new(db.connection()), Arc::new(profiles))
}

#[tokio::test]
async fn test_concurrent_ensure_from_both_sides_converges() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("pg_dm_ensure");
    let (a, b) = (builder.user_n(1), builder.user_n(2));

    let (left, right) = tokio::join!(
        service.ensure_conversation(a, b),
        service.ensure_conversation(b, a)
    );
    let (left, right) = (left.unwrap(), right.unwrap());
    assert_uuid_eq(left.id, right.id, "conversation id");

    let again = service.ensure_conversation(a, b).await.unwrap();
    assert_uuid_eq(again.id, left.id, "conversation id after retry");
}

#[tokio::test]
async fn test_history_preserves_send_order() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("pg_dm_history");
    let (a, b) = (builder.user_n(1), builder.user_n(2));
    let conversation = service.ensure_conversation(a, b).await.unwrap();

    for (sender, text) in [(a, "m1"), (b, "m2"), (a, "m3")] {
        service
            .send(conversation.id, sender, text.into())
            .await
            .unwrap();
    }

    let history = service.history(conversation.id, b, None).await.unwrap();
    let bodies: Vec<_> = history.iter().map(|v| v.message.body.as_str()).collect();
    assert_eq!(bodies, vec!["m1", "m2", "m3"]);
    assert_non_decreasing(&history, |v| v.message.order_key(), "history order");
}

#[tokio::test]
async fn test_history_limit_returns_latest_ascending() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("pg_dm_limit");
    let (a, b) = (builder.user_n(1), builder.user_n(2));
    let conversation = service.ensure_conversation(a, b).await.unwrap();

    for i in 0..6 {
        service
            .send(conversation.id, a, format!("m{i}"))
            .await
            .unwrap();
    }

    let history = service.history(conversation.id, a, Some(3)).await.unwrap();
    let bodies: Vec<_> = history.iter().map(|v| v.message.body.as_str()).collect();
    assert_eq!(bodies, vec!["m3", "m4", "m5"]);
}

#[tokio::test]
async fn test_stored_message_matches_returned_one() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("pg_dm_roundtrip");
    let (a, b) = (builder.user_n(1), builder.user_n(2));
    let conversation = service.ensure_conversation(a, b).await.unwrap();

    let sent = service
        .send(conversation.id, a, "  spaced  ".into())
        .await
        .unwrap();
    let history = service.history(conversation.id, a, None).await.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message, sent);
}

#[tokio::test]
async fn test_conversations_list_includes_profile_card() {
    let db = TestDatabase::new().await;
    let service = service(&db);
    let builder = TestDataBuilder::from_test_name("pg_dm_list");
    let (a, b, c) = (builder.user_n(1), builder.user_n(2), builder.user_n(3));
    db.create_test_profile(b, "Bea").await;

    service.ensure_conversation(a, b).await.unwrap();
    service.ensure_conversation(a, c).await.unwrap();

    let list = service.list_conversations(a).await.unwrap();
    assert_eq!(list.len(), 2);
    let with_b = assert_some(
        list.iter().find(|s| s.other_user.user_id == b),
        "conversation with b",
    );
    assert_eq!(with_b.other_user.name, "Bea");

    assert!(service.list_conversations(builder.user_n(4)).await.unwrap().is_empty());
}
