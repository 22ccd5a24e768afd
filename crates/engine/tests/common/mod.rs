#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Engine, MoneyCents, PageRequest, Scope, Transaction, TransactionDraft, users,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

pub async fn new_user(db: &DatabaseConnection, email: &str) -> Scope {
    let now = Utc::now();
    let user = users::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        name: ActiveValue::Set("Alice".to_string()),
        email: ActiveValue::Set(email.to_string()),
        password_hash: ActiveValue::Set("irrelevant".to_string()),
        token_version: ActiveValue::Set(Uuid::new_v4()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    Scope::for_user(user.id)
}

pub async fn new_budget(engine: &Engine, scope: Scope, name: &str, goal_cents: i64) -> Uuid {
    engine
        .create_budget(scope, name, MoneyCents::new(goal_cents))
        .await
        .unwrap()
        .budget
        .id
}

pub async fn new_category(engine: &Engine, scope: Scope, name: &str) -> Uuid {
    engine.create_category(scope, name).await.unwrap().id
}

pub async fn new_transaction(
    engine: &Engine,
    scope: Scope,
    budget_id: Uuid,
    category_id: Uuid,
    amount_cents: i64,
    date: NaiveDate,
) -> Transaction {
    engine
        .create_transaction(
            scope,
            budget_id,
            TransactionDraft {
                description: "entry".to_string(),
                amount: MoneyCents::new(amount_cents),
                date,
                category_id,
            },
        )
        .await
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn first_page(per: u64) -> PageRequest {
    PageRequest::first(per)
}
