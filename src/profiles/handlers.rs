use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{OnboardingResponse, ProfileResponse, UpdateProfileRequest},
    repo::{self, TasteFields},
};
use crate::{
    auth::jwt::AuthUser, error::AppError, preferences::PreferencesPatch, state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).patch(update_profile))
}

pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding", get(get_onboarding).put(put_onboarding))
        .route("/onboarding/complete", post(complete_onboarding))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = repo::get_or_create(&state.db, user_id).await?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if body.is_empty() {
        warn!(%user_id, "empty profile update");
        return Err(AppError::bad_request("Nothing to update"));
    }

    let current = repo::get_or_create(&state.db, user_id).await?;
    let mut fields = TasteFields::from(&current);
    body.apply_to(&mut fields);

    let updated = repo::update_taste_fields(&state.db, user_id, &fields).await?;
    info!(%user_id, "profile updated");
    Ok(Json(updated.into()))
}

#[instrument(skip(state))]
pub async fn get_onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<OnboardingResponse>, AppError> {
    let profile = repo::get_or_create(&state.db, user_id).await?;
    Ok(Json(OnboardingResponse {
        preferences: profile.preferences.0,
        onboarding_completed: profile.onboarding_completed,
    }))
}

#[instrument(skip(state, patch))]
pub async fn put_onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<OnboardingResponse>, AppError> {
    let preferences = repo::patch_preferences(&state.db, user_id, patch).await?;
    let profile = repo::get_or_create(&state.db, user_id).await?;
    Ok(Json(OnboardingResponse {
        preferences,
        onboarding_completed: profile.onboarding_completed,
    }))
}

#[instrument(skip(state))]
pub async fn complete_onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, AppError> {
    let profile = repo::get_or_create(&state.db, user_id).await?;
    let has_name = profile
        .preferences
        .name
        .as_deref()
        .or(profile.first_name.as_deref())
        .is_some_and(|n| !n.trim().is_empty());

    if !has_name {
        warn!(%user_id, "onboarding completed without a name");
        return Err(AppError::bad_request("A name is required to finish onboarding"));
    }

    repo::mark_onboarding_completed(&state.db, user_id).await?;
    info!(%user_id, "onboarding completed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_state, send};
    use axum::http::Method;

    #[tokio::test]
    async fn profile_routes_require_auth() {
        let app = profile_routes().merge(onboarding_routes()).with_state(fake_state());
        let (status, _) = send(app.clone(), Method::GET, "/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(app, Method::POST, "/onboarding/complete", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_before_touching_db() {
        let state = fake_state();
        let token = crate::test_support::bearer(&state, uuid::Uuid::new_v4());
        let app = profile_routes().with_state(state);
        let (status, body) = send(
            app,
            Method::PATCH,
            "/profile",
            Some(&token),
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nothing to update");
    }

    #[test]
    fn update_request_trims_and_clears() {
        let mut fields = TasteFields {
            first_name: Some("Ada".into()),
            suggestions: Some("Try ramen".into()),
            ..Default::default()
        };
        UpdateProfileRequest {
            suggestions: Some("   ".into()),
            cuisine_variety: Some("  You love Thai. ".into()),
            ..Default::default()
        }
        .apply_to(&mut fields);
        assert_eq!(fields.first_name.as_deref(), Some("Ada"));
        assert_eq!(fields.suggestions, None);
        assert_eq!(fields.cuisine_variety.as_deref(), Some("You love Thai."));
    }
}
