use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use api_types::transaction::{
    TransactionListQuery, TransactionListResponse, TransactionNew, TransactionUpdate,
    TransactionView,
};
use engine::{
    DEFAULT_PER_TRANSACTIONS, MoneyCents, PageRequest, Scope, Transaction, TransactionDraft,
    TransactionFilter, TransactionPatch, users,
};

use crate::{ServerError, page_meta, server::ServerState};

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        budget_id: tx.budget_id,
        category_id: tx.category_id,
        description: tx.description,
        amount_cents: tx.amount.cents(),
        date: tx.date,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

async fn list_page(
    state: &ServerState,
    user: &users::Model,
    budget_id: Option<Uuid>,
    query: TransactionListQuery,
) -> Result<TransactionListResponse, ServerError> {
    let page = PageRequest::new(query.page, query.per, DEFAULT_PER_TRANSACTIONS)?;
    let filter = TransactionFilter {
        from: query.from,
        to: query.to,
        category_id: query.category_id,
    };
    let result = state
        .engine
        .list_transactions(Scope::for_user(user.id), budget_id, &filter, page)
        .await?;

    Ok(TransactionListResponse {
        data: result.items.into_iter().map(view).collect(),
        meta: page_meta(result.meta),
    })
}

/// Transactions of one budget.
pub(crate) async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(budget_id): Path<Uuid>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    Ok(Json(list_page(&state, &user, Some(budget_id), query).await?))
}

/// Transactions across every budget the principal owns.
pub(crate) async fn list_all(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    Ok(Json(list_page(&state, &user, None, query).await?))
}

pub(crate) async fn show(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path((budget_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .transaction(Scope::for_user(user.id), budget_id, id)
        .await?;
    Ok(Json(view(tx)))
}

pub(crate) async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<impl IntoResponse, ServerError> {
    let draft = TransactionDraft {
        description: payload.description,
        amount: MoneyCents::new(payload.amount_cents),
        date: payload.date,
        category_id: payload.category_id,
    };
    let tx = state
        .engine
        .create_transaction(Scope::for_user(user.id), budget_id, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub(crate) async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path((budget_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = TransactionPatch {
        description: payload.description,
        amount: payload.amount_cents.map(MoneyCents::new),
        date: payload.date,
        category_id: payload.category_id,
    };
    let tx = state
        .engine
        .update_transaction(Scope::for_user(user.id), budget_id, id, patch)
        .await?;

    Ok(Json(view(tx)))
}

pub(crate) async fn destroy(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path((budget_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(Scope::for_user(user.id), budget_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
