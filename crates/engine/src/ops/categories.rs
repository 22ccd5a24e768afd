use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, Page, PageMeta, PageRequest, ResultEngine, categories, transactions,
};

use super::{Engine, Scope, with_tx};

fn validate_category_name(name: &str) -> ResultEngine<()> {
    if name.trim().is_empty() {
        return Err(EngineError::Validation(vec![
            "Name can't be blank".to_string(),
        ]));
    }
    Ok(())
}

impl Engine {
    /// Lists the principal's categories, alphabetical by name.
    pub async fn list_categories(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> ResultEngine<Page<Category>> {
        with_tx!(self, |db_tx| {
            let paginator = categories::Entity::find()
                .filter(categories::Column::UserId.eq(scope.user_id()))
                .order_by_asc(categories::Column::Name)
                .paginate(&db_tx, page.per());

            let counts = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page.index()).await?;

            Ok(Page {
                items: models.into_iter().map(Category::from).collect(),
                meta: PageMeta {
                    page: page.page(),
                    per: page.per(),
                    total_pages: counts.number_of_pages,
                    total_count: counts.number_of_items,
                },
            })
        })
    }

    /// Returns a single category within the scope.
    pub async fn category(&self, scope: Scope, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, scope, category_id).await?;
            Ok(Category::from(model))
        })
    }

    /// Creates a category. Names are unique per owner.
    pub async fn create_category(&self, scope: Scope, name: &str) -> ResultEngine<Category> {
        validate_category_name(name)?;

        with_tx!(self, |db_tx| {
            self.require_unique_category_name(&db_tx, scope, name, None)
                .await?;

            let now = Utc::now();
            let active = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(scope.user_id()),
                name: ActiveValue::Set(name.to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Renames a category.
    pub async fn update_category(
        &self,
        scope: Scope,
        category_id: Uuid,
        name: &str,
    ) -> ResultEngine<Category> {
        validate_category_name(name)?;

        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, scope, category_id).await?;
            self.require_unique_category_name(&db_tx, scope, name, Some(model.id))
                .await?;

            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(name.to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(&db_tx).await?;
            Ok(Category::from(updated))
        })
    }

    /// Deletes a category, unless transactions still reference it
    /// (referential restriction).
    pub async fn delete_category(&self, scope: Scope, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, scope, category_id).await?;

            let in_use = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(model.id))
                .count(&db_tx)
                .await?;
            if in_use > 0 {
                return Err(EngineError::Conflict(
                    "Cannot delete record because dependent transactions exist".to_string(),
                ));
            }

            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_unique_category_name(
        &self,
        db: &DatabaseTransaction,
        scope: Scope,
        name: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(scope.user_id()))
            .filter(categories::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }

        if query.one(db).await?.is_some() {
            return Err(EngineError::Validation(vec![
                "Name has already been taken".to_string(),
            ]));
        }
        Ok(())
    }
}
