use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::Recipe;

#[derive(Debug, Clone, FromRow)]
pub struct LikedRecipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub created_at: OffsetDateTime,
}

const LIKED_COLUMNS: &str =
    "id, user_id, recipe_name, ingredients, instructions, missing_ingredients, created_at";

/// Liking the same recipe name again overwrites the stored copy.
pub async fn upsert(db: &PgPool, user_id: Uuid, recipe: &Recipe) -> anyhow::Result<LikedRecipe> {
    let row = sqlx::query_as::<_, LikedRecipe>(&format!(
        r#"
        INSERT INTO liked_recipes (user_id, recipe_name, ingredients, instructions, missing_ingredients)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, recipe_name) DO UPDATE
           SET ingredients = EXCLUDED.ingredients,
               instructions = EXCLUDED.instructions,
               missing_ingredients = EXCLUDED.missing_ingredients,
               created_at = now()
        RETURNING {LIKED_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&recipe.name)
    .bind(&recipe.ingredients)
    .bind(&recipe.instructions)
    .bind(&recipe.missing_ingredients)
    .fetch_one(db)
    .await
    .context("upsert liked recipe")?;
    Ok(row)
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<LikedRecipe>> {
    let rows = sqlx::query_as::<_, LikedRecipe>(&format!(
        "SELECT {LIKED_COLUMNS} FROM liked_recipes WHERE user_id = $1 \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list liked recipes")?;
    Ok(rows)
}

/// Returns false when the row does not exist or belongs to someone else.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM liked_recipes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete liked recipe")?;
    Ok(res.rows_affected() > 0)
}
