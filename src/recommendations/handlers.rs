use axum::{extract::State, routing::post, Json, Router};
use tracing::{instrument, warn};

use super::{
    dto::{RecommendationsRequest, RecommendationsResponse, DEFAULT_COUNT, MAX_COUNT},
    services,
};
use crate::{
    auth::jwt::AuthUser, error::AppError, profiles::repo as profiles, state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/recommendations", post(generate_recommendations))
}

#[instrument(skip(state, body))]
pub async fn generate_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let count = body.count.unwrap_or(DEFAULT_COUNT);
    if !(1..=MAX_COUNT).contains(&count) {
        warn!(%user_id, count, "recommendation count out of range");
        return Err(AppError::bad_request(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }

    let prefs = match body.preferences {
        Some(p) => p,
        None => profiles::get_or_create(&state.db, user_id).await?.preferences.0,
    };

    let recommendations = services::generate(state.llm.as_ref(), &prefs, count).await?;
    Ok(Json(RecommendationsResponse { recommendations }))
}
