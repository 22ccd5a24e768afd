use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetPatch, BudgetSummary, EngineError, MoneyCents, Page, PageMeta, PageRequest,
    ResultEngine, budgets, transactions,
};

use super::{Engine, Scope, with_tx};

fn validate_budget_fields(name: &str, goal: MoneyCents) -> ResultEngine<()> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("Name can't be blank".to_string());
    }
    if !goal.is_positive() {
        errors.push("Financial goal must be greater than 0".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(errors))
    }
}

impl Engine {
    /// Lists the principal's budgets, newest-created first, with derived
    /// totals.
    ///
    /// Totals for the whole page come from one grouped SUM, not one query per
    /// budget.
    pub async fn list_budgets(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> ResultEngine<Page<BudgetSummary>> {
        with_tx!(self, |db_tx| {
            let paginator = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(scope.user_id()))
                .order_by_desc(budgets::Column::CreatedAt)
                .paginate(&db_tx, page.per());

            let counts = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page.index()).await?;

            let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
            let spent = self.total_spent_by_budget(&db_tx, &ids).await?;

            let items = models
                .into_iter()
                .map(|model| {
                    let total = spent.get(&model.id).copied().unwrap_or(0);
                    BudgetSummary::new(Budget::from(model), MoneyCents::new(total))
                })
                .collect();

            Ok(Page {
                items,
                meta: PageMeta {
                    page: page.page(),
                    per: page.per(),
                    total_pages: counts.number_of_pages,
                    total_count: counts.number_of_items,
                },
            })
        })
    }

    /// Returns a single budget with its derived totals.
    pub async fn budget(&self, scope: Scope, budget_id: Uuid) -> ResultEngine<BudgetSummary> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, scope, budget_id).await?;
            let total = self.total_spent(&db_tx, model.id).await?;
            Ok(BudgetSummary::new(Budget::from(model), total))
        })
    }

    /// Creates a budget owned by the principal.
    pub async fn create_budget(
        &self,
        scope: Scope,
        name: &str,
        financial_goal: MoneyCents,
    ) -> ResultEngine<BudgetSummary> {
        validate_budget_fields(name, financial_goal)?;

        let now = Utc::now();
        let active = budgets::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(scope.user_id()),
            name: ActiveValue::Set(name.to_string()),
            goal_cents: ActiveValue::Set(financial_goal.cents()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        with_tx!(self, |db_tx| {
            let model = active.insert(&db_tx).await?;
            Ok(BudgetSummary::new(Budget::from(model), MoneyCents::ZERO))
        })
    }

    /// Updates a budget. Absent patch fields keep their current value.
    pub async fn update_budget(
        &self,
        scope: Scope,
        budget_id: Uuid,
        patch: BudgetPatch,
    ) -> ResultEngine<BudgetSummary> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, scope, budget_id).await?;

            let name = patch.name.unwrap_or_else(|| model.name.clone());
            let goal = patch
                .financial_goal
                .unwrap_or(MoneyCents::new(model.goal_cents));
            validate_budget_fields(&name, goal)?;

            let mut active: budgets::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            active.goal_cents = ActiveValue::Set(goal.cents());
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(&db_tx).await?;

            let total = self.total_spent(&db_tx, updated.id).await?;
            Ok(BudgetSummary::new(Budget::from(updated), total))
        })
    }

    /// Deletes a budget and all its transactions in one store transaction
    /// (cascade).
    pub async fn delete_budget(&self, scope: Scope, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, scope, budget_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::BudgetId.eq(model.id))
                .exec(&db_tx)
                .await?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            Ok(())
        })
    }

    /// SUM of transaction amounts for one budget; 0 when it has none.
    pub(super) async fn total_spent(
        &self,
        db: &DatabaseTransaction,
        budget_id: Uuid,
    ) -> ResultEngine<MoneyCents> {
        let total: Option<Option<i64>> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::AmountCents.sum(), "total_cents")
            .filter(transactions::Column::BudgetId.eq(budget_id))
            .into_tuple()
            .one(db)
            .await?;

        Ok(MoneyCents::new(total.flatten().unwrap_or(0)))
    }

    /// Grouped SUM over a set of budgets. Budgets with no transactions are
    /// simply absent from the map.
    async fn total_spent_by_budget(
        &self,
        db: &DatabaseTransaction,
        budget_ids: &[Uuid],
    ) -> ResultEngine<HashMap<Uuid, i64>> {
        if budget_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::BudgetId)
            .column_as(transactions::Column::AmountCents.sum(), "total_cents")
            .filter(transactions::Column::BudgetId.is_in(budget_ids.iter().copied()))
            .group_by(transactions::Column::BudgetId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
