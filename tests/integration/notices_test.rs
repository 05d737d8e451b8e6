//! Integration tests for the single-active-notice invariant
//!
//! After any sequence of activations, at most one notice is active and it is
//! the most recently activated one.

use medbank::error::AppError;
use medbank::models::{CreateNotice, UpdateNotice};
use medbank::services::NoticeService;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::TestDb;

async fn create_notice(pool: &PgPool, title: &str, activate: bool) -> medbank::models::Notice {
    NoticeService::create(
        pool,
        CreateNotice {
            title: title.to_string(),
            body: format!("{} body", title),
            activate,
        },
    )
    .await
    .expect("create notice")
}

async fn active_ids(pool: &PgPool) -> Vec<Uuid> {
    sqlx::query_scalar("SELECT id FROM notices WHERE active = true")
        .fetch_all(pool)
        .await
        .expect("query active notices")
}

#[actix_web::test]
async fn test_activation_deactivates_all_siblings() {
    let db = TestDb::new().await;

    let n1 = create_notice(&db.pool, "Exam week", true).await;
    let n2 = create_notice(&db.pool, "Maintenance", false).await;

    assert_eq!(active_ids(&db.pool).await, vec![n1.id]);

    let activated = NoticeService::activate_exclusively(&db.pool, n2.id)
        .await
        .expect("activate");
    assert!(activated.active);
    assert!(activated.last_activated_at.is_some());

    assert_eq!(active_ids(&db.pool).await, vec![n2.id]);

    // The deactivated sibling is otherwise unchanged
    let n1_after = NoticeService::get_by_id(&db.pool, n1.id)
        .await
        .expect("fetch n1");
    assert!(!n1_after.active);
    assert_eq!(n1_after.title, "Exam week");
    assert_eq!(n1_after.body, "Exam week body");
}

#[actix_web::test]
async fn test_singleton_invariant_over_activation_sequence() {
    let db = TestDb::new().await;

    let notices = [
        create_notice(&db.pool, "First", false).await,
        create_notice(&db.pool, "Second", false).await,
        create_notice(&db.pool, "Third", false).await,
    ];

    // Activate in a shuffled order; the last activation always wins
    for target in [2usize, 0, 1, 0] {
        NoticeService::activate_exclusively(&db.pool, notices[target].id)
            .await
            .expect("activate");
        assert_eq!(active_ids(&db.pool).await, vec![notices[target].id]);
    }

    let active = NoticeService::active(&db.pool)
        .await
        .expect("active query")
        .expect("one notice active");
    assert_eq!(active.id, notices[0].id);
}

#[actix_web::test]
async fn test_activation_is_idempotent() {
    let db = TestDb::new().await;

    let n1 = create_notice(&db.pool, "Only one", false).await;
    create_notice(&db.pool, "Bystander", false).await;

    let first = NoticeService::activate_exclusively(&db.pool, n1.id)
        .await
        .expect("activate");
    let second = NoticeService::activate_exclusively(&db.pool, n1.id)
        .await
        .expect("activate again");

    assert_eq!(active_ids(&db.pool).await, vec![n1.id]);
    // Re-activation refreshes the timestamp so clients re-show the notice
    assert!(second.last_activated_at >= first.last_activated_at);
}

#[actix_web::test]
async fn test_no_notice_active_until_first_activation() {
    let db = TestDb::new().await;

    create_notice(&db.pool, "Draft", false).await;

    assert!(active_ids(&db.pool).await.is_empty());
    assert!(NoticeService::active(&db.pool)
        .await
        .expect("active query")
        .is_none());
}

#[actix_web::test]
async fn test_activating_missing_notice_is_not_found() {
    let db = TestDb::new().await;
    create_notice(&db.pool, "Survivor", true).await;

    let result = NoticeService::activate_exclusively(&db.pool, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The failed activation rolled back; the survivor is still active
    assert_eq!(active_ids(&db.pool).await.len(), 1);
}

#[actix_web::test]
async fn test_update_with_active_true_routes_through_maintainer() {
    let db = TestDb::new().await;

    create_notice(&db.pool, "Old news", true).await;
    let n2 = create_notice(&db.pool, "Fresh news", false).await;

    NoticeService::update(
        &db.pool,
        n2.id,
        UpdateNotice {
            title: None,
            body: None,
            active: Some(true),
        },
    )
    .await
    .expect("update");

    assert_eq!(active_ids(&db.pool).await, vec![n2.id]);

    // Deactivation is a plain write, leaving zero active notices
    NoticeService::update(
        &db.pool,
        n2.id,
        UpdateNotice {
            title: None,
            body: None,
            active: Some(false),
        },
    )
    .await
    .expect("update");

    assert!(active_ids(&db.pool).await.is_empty());
}

#[actix_web::test]
async fn test_delete_notice() {
    let db = TestDb::new().await;

    let n1 = create_notice(&db.pool, "Ephemeral", false).await;
    NoticeService::delete(&db.pool, n1.id)
        .await
        .expect("delete");

    let result = NoticeService::get_by_id(&db.pool, n1.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
