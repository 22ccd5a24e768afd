use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use api_types::{
    category::{CategoryListResponse, CategoryNew, CategoryUpdate, CategoryView},
    page::PageQuery,
};
use engine::{Category, DEFAULT_PER_CATEGORIES, PageRequest, Scope, users};

use crate::{ServerError, page_meta, server::ServerState};

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub(crate) async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let page = PageRequest::new(query.page, query.per, DEFAULT_PER_CATEGORIES)?;
    let result = state
        .engine
        .list_categories(Scope::for_user(user.id), page)
        .await?;

    Ok(Json(CategoryListResponse {
        data: result.items.into_iter().map(view).collect(),
        meta: page_meta(result.meta),
    }))
}

pub(crate) async fn show(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(Scope::for_user(user.id), id).await?;
    Ok(Json(view(category)))
}

pub(crate) async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(payload): Json<CategoryNew>,
) -> Result<impl IntoResponse, ServerError> {
    let category = state
        .engine
        .create_category(Scope::for_user(user.id), &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(view(category))))
}

pub(crate) async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(Scope::for_user(user.id), id, &payload.name)
        .await?;

    Ok(Json(view(category)))
}

pub(crate) async fn destroy(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(Scope::for_user(user.id), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
