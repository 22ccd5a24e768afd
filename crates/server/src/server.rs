use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{auth, budgets, categories, transactions, user};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Resolves the principal from the Bearer token and injects the user row
/// into the request. Stale tokens (rotated `token_version`) are rejected the
/// same as malformed ones.
async fn require_auth(
    auth_header: TypedHeader<Authorization<Bearer>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (user_id, version) =
        auth::decode_token(auth_header.token()).ok_or(StatusCode::UNAUTHORIZED)?;

    let user = users::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if user.token_version != version {
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::show)
                .patch(budgets::update)
                .delete(budgets::destroy),
        )
        .route(
            "/budgets/{budget_id}/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/budgets/{budget_id}/transactions/{id}",
            get(transactions::show)
                .patch(transactions::update)
                .delete(transactions::destroy),
        )
        .route("/transactions", get(transactions::list_all))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::show)
                .patch(categories::update)
                .delete(categories::destroy),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Registration and session endpoints authenticate themselves.
    let public = Router::new()
        .route("/users", post(user::register))
        .route("/session", post(user::login).delete(user::logout));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}

/// Builds the full application router. Useful for in-process tests driving
/// requests through it without a socket.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

/// Binds `addr` and serves until the process is stopped.
pub async fn run(
    engine: Engine,
    db: DatabaseConnection,
    addr: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, db, listener).await
}

/// Serves on an already bound listener. Useful for tests binding port 0.
pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(engine, db)).await?;
    Ok(())
}
