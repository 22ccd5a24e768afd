//! Ownership scope resolution.
//!
//! [`Scope`] is the single point where authorization is enforced: every
//! operation receives one and every query starts from the record set it
//! resolves. A missing record and a record owned by someone else both come
//! back as `NotFound` so the engine never leaks whether foreign data exists.

use sea_orm::{DatabaseTransaction, JoinType, QueryFilter, QuerySelect, Select, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, categories, transactions};

use super::Engine;

/// The authenticated principal an operation runs as.
///
/// Constructed once per request by the caller; operations cannot be invoked
/// without one, which makes "no query without a scope" a type-level fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scope {
    user_id: Uuid,
}

impl Scope {
    pub fn for_user(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Engine {
    /// Resolves a budget by id within the scope, or `NotFound`.
    pub(super) async fn require_budget(
        &self,
        db: &DatabaseTransaction,
        scope: Scope,
        budget_id: Uuid,
    ) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(budget_id)
            .filter(budgets::Column::UserId.eq(scope.user_id()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("budget"))
    }

    /// Resolves a category by id within the scope, or `NotFound`.
    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        scope: Scope,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(scope.user_id()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("category"))
    }

    /// Resolves a transaction by id inside a scoped budget, or `NotFound`.
    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        scope: Scope,
        budget_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        let budget = self.require_budget(db, scope, budget_id).await?;
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::BudgetId.eq(budget.id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("transaction"))
    }

    /// The base transaction set the rest of the pipeline may operate on.
    ///
    /// With a budget id the budget is resolved through the scope first; without
    /// one the set spans every budget the principal owns, via a join. No
    /// downstream component re-derives ownership.
    pub(super) async fn scoped_transactions(
        &self,
        db: &DatabaseTransaction,
        scope: Scope,
        budget_id: Option<Uuid>,
    ) -> ResultEngine<Select<transactions::Entity>> {
        match budget_id {
            Some(id) => {
                let budget = self.require_budget(db, scope, id).await?;
                Ok(transactions::Entity::find()
                    .filter(transactions::Column::BudgetId.eq(budget.id)))
            }
            None => Ok(transactions::Entity::find()
                .join(JoinType::InnerJoin, transactions::Relation::Budgets.def())
                .filter(budgets::Column::UserId.eq(scope.user_id()))),
        }
    }
}
