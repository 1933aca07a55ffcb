use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::MealType;

#[derive(Debug, Clone, FromRow)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    pub meal_name: String,
    pub restaurant_name: Option<String>,
    pub expense_cents: i64,
    pub eaten_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMealEntry<'a> {
    pub meal_type: MealType,
    pub meal_name: &'a str,
    pub restaurant_name: Option<&'a str>,
    pub expense_cents: i64,
}

/// Per-type aggregate row: (meal_type, entries, expense_cents).
#[derive(Debug, Clone, FromRow)]
pub struct TypeTotals {
    pub meal_type: String,
    pub entries: i64,
    pub expense_cents: i64,
}

const ENTRY_COLUMNS: &str =
    "id, user_id, meal_type, meal_name, restaurant_name, expense_cents, eaten_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    entry: &NewMealEntry<'_>,
) -> anyhow::Result<MealEntry> {
    let row = sqlx::query_as::<_, MealEntry>(&format!(
        r#"
        INSERT INTO meal_history (user_id, meal_type, meal_name, restaurant_name, expense_cents)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {ENTRY_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(entry.meal_type.as_str())
    .bind(entry.meal_name)
    .bind(entry.restaurant_name)
    .bind(entry.expense_cents)
    .fetch_one(db)
    .await
    .context("insert meal history")?;
    Ok(row)
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    meal_type: Option<MealType>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<MealEntry>> {
    let rows = sqlx::query_as::<_, MealEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
          FROM meal_history
         WHERE user_id = $1
           AND ($2::text IS NULL OR meal_type = $2)
         ORDER BY eaten_at DESC
         LIMIT $3 OFFSET $4
        "#
    ))
    .bind(user_id)
    .bind(meal_type.map(MealType::as_str))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list meal history")?;
    Ok(rows)
}

/// Totals per meal type over the last `days` days, or all time.
pub async fn totals_by_type(
    db: &PgPool,
    user_id: Uuid,
    days: Option<i32>,
) -> anyhow::Result<Vec<TypeTotals>> {
    let rows = sqlx::query_as::<_, TypeTotals>(
        r#"
        SELECT meal_type,
               COUNT(*)::bigint AS entries,
               COALESCE(SUM(expense_cents), 0)::bigint AS expense_cents
          FROM meal_history
         WHERE user_id = $1
           AND ($2::int IS NULL OR eaten_at >= now() - make_interval(days => $2::int))
         GROUP BY meal_type
         ORDER BY meal_type
        "#,
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(db)
    .await
    .context("summarize meal history")?;
    Ok(rows)
}
