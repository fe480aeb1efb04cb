use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    users::dto::{FriendSummary, PublicUser},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id", get(get_user))
        .route("/users/:id/friends", get(get_user_friends))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.find_by_id(id).await?.ok_or_else(|| {
        warn!(%id, "user not found");
        ApiError::NotFound
    })?;
    debug!(%caller, %id, "user loaded");
    Ok(Json(PublicUser::from(&user)))
}

/// Friends in the order they appear on the user's list; dangling ids are skipped.
#[instrument(skip(state))]
pub async fn get_user_friends(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    let user = state.users.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    let mut found: HashMap<Uuid, _> = state
        .users
        .find_many(&user.friends)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let friends: Vec<FriendSummary> = user
        .friends
        .iter()
        .filter_map(|fid| found.remove(fid))
        .map(FriendSummary::from)
        .collect();

    debug!(%caller, %id, count = friends.len(), "friends loaded");
    Ok(Json(friends))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::build_app,
        auth::services::JwtKeys,
        users::repo_types::{NewUser, User},
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn new_user(email: &str, friends: Vec<Uuid>) -> NewUser {
        NewUser {
            first_name: "Test".into(),
            last_name: email.into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            picture_path: format!("{email}.png"),
            friends,
            location: Some("Somewhere".into()),
            occupation: None,
            viewed_profile: 0,
            impressions: 0,
        }
    }

    async fn create(state: &AppState, email: &str, friends: Vec<Uuid>) -> User {
        state.users.create(new_user(email, friends)).await.unwrap()
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let response = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn get_user_requires_token() {
        let state = AppState::fake();
        let user = create(&state, "a@example.com", vec![]).await;

        let (status, body) = get_json(build_app(state), &format!("/users/{}", user.id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access Denied");
    }

    #[tokio::test]
    async fn get_user_rejects_forged_token() {
        let state = AppState::fake();
        let user = create(&state, "a@example.com", vec![]).await;
        let forged = JwtKeys::new(&crate::config::JwtConfig {
            secret: "someone-else".into(),
            ttl_minutes: None,
        })
        .sign(user.id)
        .unwrap();

        let (status, _) = get_json(
            build_app(state),
            &format!("/users/{}", user.id),
            Some(&forged),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_user_returns_public_projection() {
        let state = AppState::fake();
        let user = create(&state, "a@example.com", vec![]).await;
        let token = JwtKeys::new(&state.config.jwt).sign(user.id).unwrap();

        let (status, body) = get_json(
            build_app(state),
            &format!("/users/{}", user.id),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_id"], user.id.to_string());
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let state = AppState::fake();
        let token = JwtKeys::new(&state.config.jwt).sign(Uuid::new_v4()).unwrap();

        let (status, _) = get_json(
            build_app(state),
            &format!("/users/{}", Uuid::new_v4()),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn friends_keep_list_order_and_skip_dangling_ids() {
        let state = AppState::fake();
        let b = create(&state, "b@example.com", vec![]).await;
        let c = create(&state, "c@example.com", vec![]).await;
        let a = create(&state, "a@example.com", vec![c.id, Uuid::new_v4(), b.id]).await;
        let token = JwtKeys::new(&state.config.jwt).sign(a.id).unwrap();

        let (status, body) = get_json(
            build_app(state),
            &format!("/users/{}/friends", a.id),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let friends = body.as_array().expect("array");
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0]["_id"], c.id.to_string());
        assert_eq!(friends[1]["_id"], b.id.to_string());
        assert_eq!(friends[1]["picturePath"], "b@example.com.png");
        assert!(friends[0].get("email").is_none());
    }
}
