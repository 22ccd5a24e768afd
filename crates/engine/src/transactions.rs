//! Transaction entity: a single ledger entry.
//!
//! A transaction belongs to exactly one budget and one category; its
//! effective owner is transitively the budget's owner. `date` is a calendar
//! date and may lie in the past or the future; `created_at` is the audit
//! timestamp used as the tie-break in listings.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budgets,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Categories,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A single ledger entry as the engine hands it out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            budget_id: model.budget_id,
            category_id: model.category_id,
            description: model.description,
            amount: MoneyCents::new(model.amount_cents),
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Payload for creating a transaction. The budget comes from the scope, not
/// the payload.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category_id: Uuid,
}

/// Partial update for a transaction. Absent fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<MoneyCents>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}
