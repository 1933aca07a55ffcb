use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateHistoryRequest, HistoryEntryResponse, HistoryQuery, HistorySummary, SummaryQuery},
    money,
    repo::{self, NewMealEntry},
    services,
};
use crate::{auth::jwt::AuthUser, error::AppError, pagination::Pagination, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(list_history).post(create_entry))
        .route("/history/summary", get(summary))
}

#[instrument(skip(state, body))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<HistoryEntryResponse>), AppError> {
    let meal_name = body.meal_name.trim();
    if meal_name.is_empty() {
        warn!(%user_id, "history entry without meal name");
        return Err(AppError::bad_request("meal_name is required"));
    }
    let Some(expense_cents) = money::to_cents(body.expense) else {
        warn!(%user_id, expense = body.expense, "invalid expense");
        return Err(AppError::bad_request(
            "expense must be a non-negative number no greater than 100000000",
        ));
    };
    let restaurant_name = body
        .restaurant_name
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let entry = repo::insert(
        &state.db,
        user_id,
        &NewMealEntry {
            meal_type: body.meal_type,
            meal_name,
            restaurant_name,
            expense_cents,
        },
    )
    .await?;
    info!(%user_id, id = %entry.id, meal_type = %body.meal_type, "meal logged");
    Ok((StatusCode::CREATED, Json(HistoryEntryResponse::try_from(entry)?)))
}

#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntryResponse>>, AppError> {
    let defaults = Pagination::default();
    let (limit, offset) = Pagination {
        limit: q.limit.unwrap_or(defaults.limit),
        offset: q.offset.unwrap_or(defaults.offset),
    }
    .clamped();

    let rows = repo::list(&state.db, user_id, q.meal_type, limit, offset).await?;
    let entries = rows
        .into_iter()
        .map(HistoryEntryResponse::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<HistorySummary>, AppError> {
    if q.days.is_some_and(|d| d < 1) {
        return Err(AppError::bad_request("days must be at least 1"));
    }
    let rows = repo::totals_by_type(&state.db, user_id, q.days).await?;
    Ok(Json(services::summarize(rows)?))
}
