use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        services::{hash_password, seed_counter, verify_password, JwtKeys},
    },
    error::ApiError,
    state::AppState,
    users::{dto::PublicUser, repo_types::NewUser},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable register payload");
        ApiError::from(e)
    })?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let new_user = NewUser {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash,
        picture_path: payload.picture_path,
        friends: payload.friends,
        location: payload.location,
        occupation: payload.occupation,
        viewed_profile: seed_counter(),
        impressions: seed_counter(),
    };

    let user = state.users.create(new_user).await.map_err(|e| {
        let err = ApiError::from(e);
        match &err {
            ApiError::EmailTaken => warn!("email already registered"),
            _ => error!(error = %err, "create user failed"),
        }
        err
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable login payload");
        ApiError::from(e)
    })?;

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::UserNotFound);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Internal(e)
    })?;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e)
    })?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(&user),
    }))
}
