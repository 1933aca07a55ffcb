use anyhow::Context;
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::RestaurantCard;

#[derive(Debug, Clone, FromRow)]
pub struct SavedRestaurant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dish_name: String,
    pub restaurant_name: String,
    pub cuisine: Option<String>,
    pub total_price_cents: Option<i64>,
    pub card: Json<Value>,
    pub created_at: OffsetDateTime,
}

const SAVED_COLUMNS: &str =
    "id, user_id, dish_name, restaurant_name, cuisine, total_price_cents, card, created_at";

/// Saving the same dish from the same restaurant again refreshes the stored card.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    card: &RestaurantCard,
    total_price_cents: Option<i64>,
) -> anyhow::Result<SavedRestaurant> {
    let row = sqlx::query_as::<_, SavedRestaurant>(&format!(
        r#"
        INSERT INTO saved_restaurants
               (user_id, dish_name, restaurant_name, cuisine, total_price_cents, card)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, dish_name, restaurant_name) DO UPDATE
           SET cuisine = EXCLUDED.cuisine,
               total_price_cents = EXCLUDED.total_price_cents,
               card = EXCLUDED.card,
               created_at = now()
        RETURNING {SAVED_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&card.name)
    .bind(&card.restaurant)
    .bind(&card.cuisine)
    .bind(total_price_cents)
    .bind(Json(card))
    .fetch_one(db)
    .await
    .context("upsert saved restaurant")?;
    Ok(row)
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<SavedRestaurant>> {
    let rows = sqlx::query_as::<_, SavedRestaurant>(&format!(
        "SELECT {SAVED_COLUMNS} FROM saved_restaurants WHERE user_id = $1 \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list saved restaurants")?;
    Ok(rows)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM saved_restaurants WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete saved restaurant")?;
    Ok(res.rows_affected() > 0)
}
