use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{GenerateRecipesRequest, LikedRecipeResponse, Recipe, RecipesResponse},
    repo, services,
};
use crate::{auth::jwt::AuthUser, error::AppError, pagination::Pagination, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/generate", post(generate_recipes))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // fridge photos
        .route("/recipes/liked", get(list_liked).post(like_recipe))
        .route("/recipes/liked/:id", delete(unlike_recipe))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[instrument(skip(state, body))]
pub async fn generate_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GenerateRecipesRequest>,
) -> Result<Json<RecipesResponse>, AppError> {
    let text = non_blank(body.ingredient_text);
    let image = non_blank(body.image_data);
    if text.is_none() && image.is_none() {
        warn!(%user_id, "recipe request without ingredients");
        return Err(AppError::bad_request(
            "Provide ingredient_text or image_data",
        ));
    }

    let recipes =
        services::generate(state.llm.as_ref(), text.as_deref(), image.as_deref()).await?;
    Ok(Json(RecipesResponse { recipes }))
}

#[instrument(skip(state, recipe))]
pub async fn like_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut recipe): Json<Recipe>,
) -> Result<(StatusCode, Json<LikedRecipeResponse>), AppError> {
    recipe.normalize();
    if recipe.name.is_empty() {
        return Err(AppError::bad_request("Recipe name is required"));
    }
    let liked = repo::upsert(&state.db, user_id, &recipe).await?;
    info!(%user_id, id = %liked.id, "recipe liked");
    Ok((StatusCode::CREATED, Json(liked.into())))
}

#[instrument(skip(state))]
pub async fn list_liked(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<LikedRecipeResponse>>, AppError> {
    let (limit, offset) = p.clamped();
    let rows = repo::list(&state.db, user_id, limit, offset).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn unlike_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Recipe not found"));
    }
    info!(%user_id, %id, "recipe unliked");
    Ok(StatusCode::NO_CONTENT)
}
