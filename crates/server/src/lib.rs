//! HTTP layer: token auth, route handlers and the mapping from engine
//! outcomes to transport-level responses. The engine itself stays
//! transport-agnostic.

use api_types::ErrorResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{app, run, run_with_listener};

mod auth;
mod budgets;
mod categories;
mod server;
mod transactions;
mod user;

pub enum ServerError {
    Engine(EngineError),
    Unauthorized,
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn messages_for_engine_error(err: EngineError) -> Vec<String> {
    match err {
        EngineError::Validation(messages) => messages,
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            vec!["internal server error".to_string()]
        }
        other => vec![other.to_string()],
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, errors) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), messages_for_engine_error(err))
            }
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                vec!["unauthorized".to_string()],
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, vec![err]),
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

fn page_meta(meta: engine::PageMeta) -> api_types::page::PageMeta {
    api_types::page::PageMeta {
        page: meta.page,
        per: meta.per,
        total_pages: meta.total_pages,
        total_count: meta.total_count,
    }
}
