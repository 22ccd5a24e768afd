//! Budget entity and its read-time views.
//!
//! A budget's `total_spent`/`remaining` are never stored: they are derived
//! from the live transaction set every time a budget is read, so they cannot
//! drift from the ledger.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub goal_cents: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A named financial goal owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub financial_goal: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            financial_goal: MoneyCents::new(model.goal_cents),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A budget together with its derived totals.
///
/// `remaining` may be negative when spending exceeds the goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub total_spent: MoneyCents,
    pub remaining: MoneyCents,
}

impl BudgetSummary {
    pub(crate) fn new(budget: Budget, total_spent: MoneyCents) -> Self {
        let remaining = budget.financial_goal - total_spent;
        Self {
            budget,
            total_spent,
            remaining,
        }
    }
}

/// Partial update for a budget. Absent fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub financial_goal: Option<MoneyCents>,
}
