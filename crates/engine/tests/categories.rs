use engine::{EngineError, TransactionFilter};
use uuid::Uuid;

mod common;
use common::*;

#[tokio::test]
async fn listing_is_alphabetical_by_name() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    for name in ["Travel", "Auto", "Food"] {
        new_category(&engine, scope, name).await;
    }

    let page = engine.list_categories(scope, first_page(50)).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Auto", "Food", "Travel"]);
    assert_eq!(page.meta.total_count, 3);
}

#[tokio::test]
async fn names_are_unique_per_owner_only() {
    let (engine, db) = engine_with_db().await;
    let alice = new_user(&db, "alice@example.com").await;
    let bob = new_user(&db, "bob@example.com").await;

    new_category(&engine, alice, "Food").await;

    let err = engine.create_category(alice, "Food").await.unwrap_err();
    match err {
        EngineError::Validation(messages) => {
            assert_eq!(messages, vec!["Name has already been taken".to_string()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // same name under a different owner is fine
    new_category(&engine, bob, "Food").await;
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;

    let err = engine.create_category(scope, "   ").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn rename_respects_uniqueness_but_allows_self() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let food = new_category(&engine, scope, "Food").await;
    new_category(&engine, scope, "Travel").await;

    let err = engine
        .update_category(scope, food, "Travel")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // renaming to its current name is a no-op, not a collision
    let renamed = engine.update_category(scope, food, "Food").await.unwrap();
    assert_eq!(renamed.name, "Food");
}

#[tokio::test]
async fn categories_are_invisible_across_users() {
    let (engine, db) = engine_with_db().await;
    let alice = new_user(&db, "alice@example.com").await;
    let bob = new_user(&db, "bob@example.com").await;
    let category_id = new_category(&engine, alice, "Food").await;

    let err = engine.category(bob, category_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .update_category(bob, category_id, "Stolen")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine.delete_category(bob, category_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_is_blocked_while_transactions_reference_it() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let budget_id = new_budget(&engine, scope, "Trip", 1000_00).await;
    let category_id = new_category(&engine, scope, "Food").await;
    let tx = new_transaction(&engine, scope, budget_id, category_id, 10_00, date(2026, 1, 1)).await;

    let err = engine.delete_category(scope, category_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine
        .delete_transaction(scope, budget_id, tx.id)
        .await
        .unwrap();
    engine.delete_category(scope, category_id).await.unwrap();

    let err = engine.category(scope, category_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn missing_ids_read_as_not_found() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;

    let err = engine.category(scope, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // a foreign category used as a listing filter reads the same way
    let err = engine
        .list_transactions(
            scope,
            None,
            &TransactionFilter {
                category_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
            first_page(20),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
