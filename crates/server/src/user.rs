//! Registration and session endpoints. These are the only handlers that talk
//! to the users table directly; everything else goes through the engine with
//! a [`engine::Scope`].

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use serde::Serialize;
use uuid::Uuid;

use api_types::user::{Login, Register, SessionResponse, UserView};
use engine::{EngineError, users};

use crate::{ServerError, auth, server::ServerState};

#[derive(Serialize)]
struct Message {
    message: String,
}

fn user_view(user: &users::Model) -> UserView {
    UserView {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn validate_registration(payload: &Register) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("Name can't be blank".to_string());
    }
    if payload.email.trim().is_empty() {
        errors.push("Email can't be blank".to_string());
    } else if !payload.email.contains('@') {
        errors.push("Email is invalid".to_string());
    }
    if payload.password.is_empty() {
        errors.push("Password can't be blank".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(errors).into())
    }
}

pub(crate) async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<impl IntoResponse, ServerError> {
    validate_registration(&payload)?;

    let email = payload.email.trim().to_lowercase();
    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    // uniqueness comes from the index on email; a duplicate, concurrent or
    // not, surfaces as a constraint violation on insert
    let now = Utc::now();
    let inserted = users::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        name: ActiveValue::Set(payload.name.trim().to_string()),
        email: ActiveValue::Set(email),
        password_hash: ActiveValue::Set(password_hash),
        token_version: ActiveValue::Set(Uuid::new_v4()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(&state.db)
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(EngineError::Validation(vec![
                "Email has already been taken".to_string(),
            ])
            .into());
        }
        Err(err) => return Err(EngineError::from(err).into()),
    };

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user_view(&user))))
}

pub(crate) async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<SessionResponse>, ServerError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(payload.email.trim().to_lowercase()))
        .one(&state.db)
        .await
        .map_err(EngineError::from)?
        .ok_or(ServerError::Unauthorized)?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    if !valid {
        return Err(ServerError::Unauthorized);
    }

    Ok(Json(SessionResponse {
        token: auth::encode_token(user.id, user.token_version),
        user: user_view(&user),
    }))
}

/// Rotates the user's `token_version`, invalidating every outstanding token.
/// Idempotent: a missing or stale token still answers 200.
pub(crate) async fn logout(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<impl IntoResponse, ServerError> {
    if let Some(TypedHeader(header)) = bearer
        && let Some((user_id, version)) = auth::decode_token(header.token())
        && let Some(user) = users::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .map_err(EngineError::from)?
        && user.token_version == version
    {
        let mut active: users::ActiveModel = user.into();
        active.token_version = ActiveValue::Set(Uuid::new_v4());
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(&state.db).await.map_err(EngineError::from)?;
    }

    Ok(Json(Message {
        message: "Logged out successfully".to_string(),
    }))
}
