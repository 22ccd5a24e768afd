use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, Page, PageMeta, PageRequest, ResultEngine, Transaction,
    TransactionDraft, TransactionPatch, transactions,
};

use super::{Engine, Scope, with_tx};

/// Filters for listing transactions.
///
/// Each field is independently optional and a missing field is a no-op; the
/// active ones compose by logical AND. `from` and `to` are both inclusive, so
/// a provided range with `from > to` is a valid empty range, not an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        self
    }
}

fn validate_transaction_fields(description: &str, amount: MoneyCents) -> ResultEngine<()> {
    let mut errors = Vec::new();
    if description.trim().is_empty() {
        errors.push("Description can't be blank".to_string());
    }
    if !amount.is_positive() {
        errors.push("Amount must be greater than 0".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(errors))
    }
}

impl Engine {
    /// Lists transactions visible to the scope, filtered and paginated.
    ///
    /// With `budget_id` the listing covers one budget (resolved through the
    /// scope first); without it, every budget the principal owns. Ordering is
    /// date descending with creation time as the tie-break, so pages stay
    /// stable across requests.
    ///
    /// A `category_id` filter naming a category outside the scope fails with
    /// `NotFound`, like every other cross-owner access.
    pub async fn list_transactions(
        &self,
        scope: Scope,
        budget_id: Option<Uuid>,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ResultEngine<Page<Transaction>> {
        with_tx!(self, |db_tx| {
            if let Some(category_id) = filter.category_id {
                self.require_category(&db_tx, scope, category_id).await?;
            }

            let paginator = self
                .scoped_transactions(&db_tx, scope, budget_id)
                .await?
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .paginate(&db_tx, page.per());

            let counts = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page.index()).await?;

            Ok(Page {
                items: models.into_iter().map(Transaction::from).collect(),
                meta: PageMeta {
                    page: page.page(),
                    per: page.per(),
                    total_pages: counts.number_of_pages,
                    total_count: counts.number_of_items,
                },
            })
        })
    }

    /// Returns one transaction from a scoped budget.
    pub async fn transaction(
        &self,
        scope: Scope,
        budget_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, scope, budget_id, transaction_id)
                .await?;
            Ok(Transaction::from(model))
        })
    }

    /// Creates a transaction against a scoped budget.
    ///
    /// The category must be owned by the principal too; a foreign category id
    /// is `NotFound`.
    pub async fn create_transaction(
        &self,
        scope: Scope,
        budget_id: Uuid,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        validate_transaction_fields(&draft.description, draft.amount)?;

        with_tx!(self, |db_tx| {
            let budget = self.require_budget(&db_tx, scope, budget_id).await?;
            let category = self
                .require_category(&db_tx, scope, draft.category_id)
                .await?;

            let now = Utc::now();
            let active = transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                budget_id: ActiveValue::Set(budget.id),
                category_id: ActiveValue::Set(category.id),
                description: ActiveValue::Set(draft.description),
                amount_cents: ActiveValue::Set(draft.amount.cents()),
                date: ActiveValue::Set(draft.date),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Transaction::from(model))
        })
    }

    /// Updates a transaction. Absent patch fields keep their current value.
    pub async fn update_transaction(
        &self,
        scope: Scope,
        budget_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, scope, budget_id, transaction_id)
                .await?;

            let description = patch
                .description
                .unwrap_or_else(|| model.description.clone());
            let amount = patch.amount.unwrap_or(MoneyCents::new(model.amount_cents));
            let date = patch.date.unwrap_or(model.date);
            validate_transaction_fields(&description, amount)?;

            let category_id = match patch.category_id {
                Some(id) if id != model.category_id => {
                    self.require_category(&db_tx, scope, id).await?.id
                }
                Some(id) => id,
                None => model.category_id,
            };

            let mut active: transactions::ActiveModel = model.into();
            active.description = ActiveValue::Set(description);
            active.amount_cents = ActiveValue::Set(amount.cents());
            active.date = ActiveValue::Set(date);
            active.category_id = ActiveValue::Set(category_id);
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(&db_tx).await?;
            Ok(Transaction::from(updated))
        })
    }

    /// Deletes a transaction from a scoped budget.
    pub async fn delete_transaction(
        &self,
        scope: Scope,
        budget_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, scope, budget_id, transaction_id)
                .await?;
            transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
