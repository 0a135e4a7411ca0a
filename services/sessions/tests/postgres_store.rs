//! Integration tests for the PostgreSQL stores
//!
//! These run the store operations against a live database at `DATABASE_URL`
//! after applying the embedded migrations. Records are matched by the ids
//! each test creates, so a shared database is fine.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use serde_json::json;
use sessions::repositories::{
    FeedbackStore, PgFeedbackStore, PgSessionStore, SessionStore, StoreError,
};
use sqlx::PgPool;
use uuid::Uuid;

async fn pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("Failed to load database config");
    let pool = init_pool(&config)
        .await
        .expect("Failed to connect to PostgreSQL");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

async fn count_titled(pool: &PgPool, title: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await
        .expect("Failed to count sessions")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_session_lifecycle() {
    let store = PgSessionStore::new(pool().await);
    assert!(store.health_check().await.unwrap());

    let created = store
        .create(&json!({ "durationMinutes": 45, "subject": "Math" }))
        .await
        .unwrap();
    assert_eq!(created.title, "Focus Session");
    assert_eq!(created.focus_rating, 3);
    assert!(!created.completed);
    assert_eq!(created.date, created.created_at);

    let id = created.id.to_string();
    assert_eq!(store.get_by_id(&id).await.unwrap(), created);

    let updated = store
        .update(&id, &json!({ "completed": true }))
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.subject, "Math");
    assert_eq!(updated.duration_minutes, 45);
    assert_eq!(updated.focus_rating, created.focus_rating);
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let again = store
        .update(&id, &json!({ "focusRating": "5" }))
        .await
        .unwrap();
    assert_eq!(again.focus_rating, 5);
    assert!(again.completed);
    assert!(again.updated_at > updated.updated_at);

    let deleted = store.delete_by_id(&id).await.unwrap();
    assert_eq!(deleted, again);

    assert!(matches!(
        store.get_by_id(&id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete_by_id(&id).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_list_is_newest_first() {
    let store = PgSessionStore::new(pool().await);

    let mut ids = Vec::new();
    for minutes in [10, 20, 30] {
        let session = store
            .create(&json!({ "durationMinutes": minutes }))
            .await
            .unwrap();
        ids.push(session.id);
    }

    let listed: Vec<Uuid> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .filter(|id| ids.contains(id))
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);

    for id in ids {
        store.delete_by_id(&id.to_string()).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_rejected_writes_persist_nothing() {
    let pool = pool().await;
    let store = PgSessionStore::new(pool.clone());
    let title = format!("rejected-{}", Uuid::now_v7());

    for fields in [
        json!({ "title": title, "durationMinutes": -10 }),
        json!({ "title": title, "durationMinutes": 3_000_000_000i64 }),
        json!({ "title": title, "durationMinutes": 25, "focusRating": 6 }),
        json!({ "title": title, "durationMinutes": 25, "date": -300_000_000_000_000i64 }),
    ] {
        let result = store.create(&fields).await;
        assert!(matches!(result, Err(StoreError::Validation(_))), "{fields}");
    }
    assert_eq!(count_titled(&pool, &title).await, 0);

    let created = store
        .create(&json!({ "title": title, "durationMinutes": 25 }))
        .await
        .unwrap();
    let id = created.id.to_string();

    let result = store
        .update(&id, &json!({ "date": -300_000_000_000_000i64 }))
        .await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(store.get_by_id(&id).await.unwrap(), created);

    assert!(matches!(
        store.update(&Uuid::now_v7().to_string(), &json!({ "completed": true })).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.get_by_id("not-an-id").await,
        Err(StoreError::MalformedId(_))
    ));

    store.delete_by_id(&id).await.unwrap();
    assert_eq!(count_titled(&pool, &title).await, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_feedback_create_and_list() {
    let store = PgFeedbackStore::new(pool().await);
    let message = format!("Love the timer {}", Uuid::now_v7());

    let created = store
        .create(&json!({ "message": format!("  {message}  ") }))
        .await
        .unwrap();
    assert_eq!(created.message, message);

    assert!(matches!(
        store.create(&json!({ "message": " " })).await,
        Err(StoreError::Validation(_))
    ));

    let listed = store.list_all().await.unwrap();
    assert!(listed.contains(&created));
}
