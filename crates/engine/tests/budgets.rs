use std::collections::HashSet;
use std::time::Duration;

use engine::{BudgetPatch, EngineError, MoneyCents, PageRequest, TransactionFilter};
use uuid::Uuid;

mod common;
use common::*;

#[tokio::test]
async fn new_budget_starts_with_zero_spent() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;

    let created = engine
        .create_budget(scope, "Trip", MoneyCents::new(1000_00))
        .await
        .unwrap();
    assert_eq!(created.total_spent, MoneyCents::ZERO);
    assert_eq!(created.remaining, MoneyCents::new(1000_00));

    let read = engine.budget(scope, created.budget.id).await.unwrap();
    assert_eq!(read, created);
}

#[tokio::test]
async fn totals_are_exact_sums_over_transactions() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let budget_id = new_budget(&engine, scope, "Trip", 1000_00).await;
    let category_id = new_category(&engine, scope, "Food").await;

    for cents in [150_00, 75_50, 24_50] {
        new_transaction(&engine, scope, budget_id, category_id, cents, date(2026, 1, 10)).await;
    }

    let summary = engine.budget(scope, budget_id).await.unwrap();
    assert_eq!(summary.total_spent, MoneyCents::new(250_00));
    assert_eq!(summary.remaining, MoneyCents::new(750_00));
}

#[tokio::test]
async fn overspent_budget_reports_negative_remaining() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let budget_id = new_budget(&engine, scope, "Trip", 1000_00).await;
    let category_id = new_category(&engine, scope, "Food").await;
    new_transaction(&engine, scope, budget_id, category_id, 1200_00, date(2026, 1, 10)).await;

    let summary = engine.budget(scope, budget_id).await.unwrap();
    assert_eq!(summary.total_spent, MoneyCents::new(1200_00));
    assert_eq!(summary.remaining, MoneyCents::new(-200_00));
}

#[tokio::test]
async fn budgets_are_invisible_across_users() {
    let (engine, db) = engine_with_db().await;
    let alice = new_user(&db, "alice@example.com").await;
    let bob = new_user(&db, "bob@example.com").await;
    let budget_id = new_budget(&engine, alice, "Trip", 1000_00).await;

    let err = engine.budget(bob, budget_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .update_budget(bob, budget_id, BudgetPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let listed = engine
        .list_budgets(bob, first_page(20))
        .await
        .unwrap();
    assert!(listed.items.is_empty());
    assert_eq!(listed.meta.total_count, 0);
}

#[tokio::test]
async fn list_orders_newest_created_first_with_totals() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let category_id = new_category(&engine, scope, "Food").await;

    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        ids.push(new_budget(&engine, scope, name, 500_00).await);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    new_transaction(&engine, scope, ids[1], category_id, 42_00, date(2026, 2, 1)).await;

    let page = engine.list_budgets(scope, first_page(20)).await.unwrap();
    let listed: Vec<Uuid> = page.items.iter().map(|s| s.budget.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    let second = page.items.iter().find(|s| s.budget.id == ids[1]).unwrap();
    assert_eq!(second.total_spent, MoneyCents::new(42_00));
    let third = page.items.iter().find(|s| s.budget.id == ids[2]).unwrap();
    assert_eq!(third.total_spent, MoneyCents::ZERO);
}

#[tokio::test]
async fn pages_partition_the_full_set() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    for i in 0..5 {
        new_budget(&engine, scope, &format!("Budget {i}"), 100_00).await;
    }

    let mut seen = HashSet::new();
    for page_no in 1..=3 {
        let request = PageRequest::new(Some(page_no), Some(2), 20).unwrap();
        let page = engine.list_budgets(scope, request).await.unwrap();
        assert_eq!(page.meta.total_count, 5);
        assert_eq!(page.meta.total_pages, 3);
        for summary in page.items {
            assert!(seen.insert(summary.budget.id), "duplicate across pages");
        }
    }
    assert_eq!(seen.len(), 5);

    let past_end = PageRequest::new(Some(4), Some(2), 20).unwrap();
    let page = engine.list_budgets(scope, past_end).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.meta.total_count, 5);
}

#[tokio::test]
async fn non_positive_page_arguments_are_rejected() {
    assert!(matches!(
        PageRequest::new(Some(0), None, 20).unwrap_err(),
        EngineError::InvalidArgument(_)
    ));
    assert!(matches!(
        PageRequest::new(None, Some(-1), 20).unwrap_err(),
        EngineError::InvalidArgument(_)
    ));
}

#[tokio::test]
async fn validation_collects_every_failed_field() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;

    let err = engine
        .create_budget(scope, "  ", MoneyCents::new(0))
        .await
        .unwrap_err();
    match err {
        EngineError::Validation(messages) => {
            assert!(messages.contains(&"Name can't be blank".to_string()));
            assert!(messages.contains(&"Financial goal must be greater than 0".to_string()));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_merges_patch_and_revalidates() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let budget_id = new_budget(&engine, scope, "Trip", 1000_00).await;

    let updated = engine
        .update_budget(
            scope,
            budget_id,
            BudgetPatch {
                name: Some("Holiday".to_string()),
                financial_goal: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.budget.name, "Holiday");
    assert_eq!(updated.budget.financial_goal, MoneyCents::new(1000_00));

    let err = engine
        .update_budget(
            scope,
            budget_id,
            BudgetPatch {
                name: None,
                financial_goal: Some(MoneyCents::new(-1)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_budget_removes_its_transactions() {
    let (engine, db) = engine_with_db().await;
    let scope = new_user(&db, "alice@example.com").await;
    let budget_id = new_budget(&engine, scope, "Trip", 1000_00).await;
    let category_id = new_category(&engine, scope, "Food").await;
    new_transaction(&engine, scope, budget_id, category_id, 10_00, date(2026, 1, 1)).await;

    engine.delete_budget(scope, budget_id).await.unwrap();

    let err = engine.budget(scope, budget_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let remaining = engine
        .list_transactions(scope, None, &TransactionFilter::default(), first_page(20))
        .await
        .unwrap();
    assert!(remaining.items.is_empty());

    // the category survives the cascade
    engine.category(scope, category_id).await.unwrap();
}
