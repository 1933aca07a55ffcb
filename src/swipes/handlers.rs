use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{FavoriteResponse, SwipeRequest, SwipeResponse},
    repo, services,
};
use crate::{auth::jwt::AuthUser, error::AppError, pagination::Pagination, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swipes", post(swipe))
        .route("/favorites", get(list_favorites))
        .route("/favorites/:id", delete(delete_favorite))
}

#[instrument(skip(state, body))]
pub async fn swipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, AppError> {
    let plan = services::plan(body.direction, body.card).map_err(|e| {
        warn!(%user_id, error = %e, "swipe rejected");
        e
    })?;
    let res = services::execute(&state, user_id, plan).await?;
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<FavoriteResponse>>, AppError> {
    let (limit, offset) = p.clamped();
    let rows = repo::list(&state.db, user_id, limit, offset).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Favorite not found"));
    }
    info!(%user_id, %id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::test_support::{bearer, fake_state, send};

    #[tokio::test]
    async fn left_swipe_touches_nothing() {
        let state = fake_state();
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/swipes",
            Some(&token),
            Some(json!({
                "direction": "left",
                "card": { "kind": "recipe", "name": "Toast" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "action": "skipped" }));
    }

    #[tokio::test]
    async fn right_swipe_with_bad_price_is_bad_request() {
        let state = fake_state();
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/swipes",
            Some(&token),
            Some(json!({
                "direction": "right",
                "card": { "kind": "restaurant", "name": "Tacos", "restaurant": "El Rey", "totalPrice": "n/a" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unrecognized totalPrice: \"n/a\"");
    }

    #[tokio::test]
    async fn unknown_direction_is_unprocessable() {
        let state = fake_state();
        let token = bearer(&state, Uuid::new_v4());
        let (status, _) = send(
            routes().with_state(state),
            Method::POST,
            "/swipes",
            Some(&token),
            Some(json!({ "direction": "down", "card": { "kind": "recipe", "name": "Toast" } })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn favorites_require_auth() {
        let app = routes().with_state(fake_state());
        let (status, _) = send(app, Method::GET, "/favorites", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
