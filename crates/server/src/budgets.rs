use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use api_types::{
    budget::{BudgetListResponse, BudgetNew, BudgetUpdate, BudgetView},
    page::PageQuery,
};
use engine::{BudgetPatch, BudgetSummary, DEFAULT_PER_BUDGETS, MoneyCents, PageRequest, Scope, users};

use crate::{ServerError, page_meta, server::ServerState};

fn view(summary: BudgetSummary) -> BudgetView {
    BudgetView {
        id: summary.budget.id,
        name: summary.budget.name,
        financial_goal_cents: summary.budget.financial_goal.cents(),
        spent_cents: summary.total_spent.cents(),
        remaining_cents: summary.remaining.cents(),
        created_at: summary.budget.created_at,
        updated_at: summary.budget.updated_at,
    }
}

pub(crate) async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let page = PageRequest::new(query.page, query.per, DEFAULT_PER_BUDGETS)?;
    let result = state
        .engine
        .list_budgets(Scope::for_user(user.id), page)
        .await?;

    Ok(Json(BudgetListResponse {
        data: result.items.into_iter().map(view).collect(),
        meta: page_meta(result.meta),
    }))
}

pub(crate) async fn show(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let summary = state.engine.budget(Scope::for_user(user.id), id).await?;
    Ok(Json(view(summary)))
}

pub(crate) async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(payload): Json<BudgetNew>,
) -> Result<impl IntoResponse, ServerError> {
    let summary = state
        .engine
        .create_budget(
            Scope::for_user(user.id),
            &payload.name,
            MoneyCents::new(payload.financial_goal_cents),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(summary))))
}

pub(crate) async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let patch = BudgetPatch {
        name: payload.name,
        financial_goal: payload.financial_goal_cents.map(MoneyCents::new),
    };
    let summary = state
        .engine
        .update_budget(Scope::for_user(user.id), id, patch)
        .await?;

    Ok(Json(view(summary)))
}

pub(crate) async fn destroy(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_budget(Scope::for_user(user.id), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
