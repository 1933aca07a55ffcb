use axum::{
    extract::{DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AnalysisResponse, AnalyzeRequest, TasteProfile, TasteProfileRequest},
    services,
};
use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    profiles::repo as profiles,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/taste-profile", post(create_taste_profile))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // food photos
        .route("/preferences/analyze", post(analyze_preferences))
}

#[instrument(skip(state, body))]
pub async fn create_taste_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<TasteProfileRequest>,
) -> Result<Json<TasteProfile>, AppError> {
    let profile =
        services::generate_taste_profile(state.llm.as_ref(), &body.food_images, &body.allergies)
            .await?;

    if body.save {
        profiles::save_taste_profile(
            &state.db,
            user_id,
            &profile.nutrition_balance,
            &profile.cuisine_variety,
            &profile.suggestions,
        )
        .await?;
        info!(%user_id, "taste profile saved");
    }

    Ok(Json(profile))
}

/// Uses the submitted preferences, or the caller's stored ones when absent.
#[instrument(skip(state, body))]
pub async fn analyze_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let prefs = match body.preferences {
        Some(p) => p,
        None => profiles::get_or_create(&state.db, user_id).await?.preferences.0,
    };
    let analysis = services::analyze_preferences(state.llm.as_ref(), &prefs).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::{
        llm::fake::FakeLlm,
        test_support::{bearer, send, state_with_llm},
    };

    #[tokio::test]
    async fn taste_profile_without_images_returns_default() {
        let state = state_with_llm(Arc::new(FakeLlm::default()));
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/taste-profile",
            Some(&token),
            Some(json!({ "food_images": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"], services::default_taste_profile().suggestions);
    }

    #[tokio::test]
    async fn taste_profile_from_images() {
        let llm = FakeLlm::with_tool(
            "create_taste_profile",
            json!({
                "nutrition_balance": "Your meals are rich in greens.",
                "cuisine_variety": "You enjoy Japanese food.",
                "suggestions": "You might try Korean."
            }),
        );
        let state = state_with_llm(Arc::new(llm));
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/taste-profile",
            Some(&token),
            Some(json!({ "food_images": ["data:image/png;base64,AAA"], "allergies": ["nuts"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cuisine_variety"], "You enjoy Japanese food.");
    }

    #[tokio::test]
    async fn incomplete_taste_profile_is_bad_gateway() {
        let llm = FakeLlm::with_tool("create_taste_profile", json!({ "suggestions": "x" }));
        let state = state_with_llm(Arc::new(llm));
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/taste-profile",
            Some(&token),
            Some(json!({ "food_images": ["AAA"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn analyze_with_inline_preferences() {
        let llm = Arc::new(FakeLlm::with_text("  You clearly love spice.  "));
        let state = state_with_llm(llm.clone());
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/preferences/analyze",
            Some(&token),
            Some(json!({ "preferences": { "budget": 20, "allergies": ["soy"] } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], "You clearly love spice.");
        assert_eq!(llm.calls().len(), 1);
    }

    #[tokio::test]
    async fn analyze_surfaces_rate_limit() {
        let state = state_with_llm(Arc::new(FakeLlm::rate_limited()));
        let token = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            routes().with_state(state),
            Method::POST,
            "/preferences/analyze",
            Some(&token),
            Some(json!({ "preferences": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Rate limit exceeded. Please try again later.");
    }
}
