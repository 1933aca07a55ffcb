use anyhow::Context;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::preferences::{Preferences, PreferencesPatch};

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub nutrition_balance: Option<String>,
    pub cuisine_variety: Option<String>,
    pub suggestions: Option<String>,
    pub cuisine_summary: Option<String>,
    pub preferences: Json<Preferences>,
    pub onboarding_completed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The editable text fields of a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteFields {
    pub first_name: Option<String>,
    pub nutrition_balance: Option<String>,
    pub cuisine_variety: Option<String>,
    pub suggestions: Option<String>,
    pub cuisine_summary: Option<String>,
}

impl From<&Profile> for TasteFields {
    fn from(p: &Profile) -> Self {
        Self {
            first_name: p.first_name.clone(),
            nutrition_balance: p.nutrition_balance.clone(),
            cuisine_variety: p.cuisine_variety.clone(),
            suggestions: p.suggestions.clone(),
            cuisine_summary: p.cuisine_summary.clone(),
        }
    }
}

const PROFILE_COLUMNS: &str = "id, first_name, nutrition_balance, cuisine_variety, suggestions, \
     cuisine_summary, preferences, onboarding_completed, created_at, updated_at";

/// Loads the caller's profile, creating an empty row if the user has none yet.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Profile> {
    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await
        .context("ensure profile")?;

    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_one(db)
    .await
    .context("select profile")?;
    Ok(profile)
}

pub async fn update_taste_fields(
    db: &PgPool,
    user_id: Uuid,
    fields: &TasteFields,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        r#"
        UPDATE profiles
           SET first_name = $2,
               nutrition_balance = $3,
               cuisine_variety = $4,
               suggestions = $5,
               cuisine_summary = $6,
               updated_at = now()
         WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&fields.first_name)
    .bind(&fields.nutrition_balance)
    .bind(&fields.cuisine_variety)
    .bind(&fields.suggestions)
    .bind(&fields.cuisine_summary)
    .fetch_one(db)
    .await
    .context("update profile taste fields")?;
    Ok(profile)
}

const SAVE_TASTE_SQL: &str = r#"
    INSERT INTO profiles (id, nutrition_balance, cuisine_variety, suggestions)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (id) DO UPDATE
       SET nutrition_balance = EXCLUDED.nutrition_balance,
           cuisine_variety = EXCLUDED.cuisine_variety,
           suggestions = EXCLUDED.suggestions,
           updated_at = now()
"#;

/// Writes only the three generated taste columns; name and summary are left alone.
pub async fn save_taste_profile(
    db: &PgPool,
    user_id: Uuid,
    nutrition_balance: &str,
    cuisine_variety: &str,
    suggestions: &str,
) -> anyhow::Result<()> {
    sqlx::query(SAVE_TASTE_SQL)
        .bind(user_id)
        .bind(nutrition_balance)
        .bind(cuisine_variety)
        .bind(suggestions)
        .execute(db)
        .await
        .context("save taste profile")?;
    Ok(())
}

/// Applies a preferences patch under a row lock and returns the merged result.
pub async fn patch_preferences(
    db: &PgPool,
    user_id: Uuid,
    patch: PreferencesPatch,
) -> anyhow::Result<Preferences> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("ensure profile")?;

    let (Json(mut prefs),): (Json<Preferences>,) =
        sqlx::query_as("SELECT preferences FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .context("lock preferences")?;

    let name_changed = patch.name.is_some();
    prefs.apply(patch);

    sqlx::query(
        r#"
        UPDATE profiles
           SET preferences = $2,
               first_name = CASE WHEN $3 THEN $4 ELSE first_name END,
               updated_at = now()
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(Json(&prefs))
    .bind(name_changed)
    .bind(&prefs.name)
    .execute(&mut *tx)
    .await
    .context("update preferences")?;

    tx.commit().await.context("commit tx")?;
    Ok(prefs)
}

pub async fn mark_onboarding_completed(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE profiles SET onboarding_completed = TRUE, updated_at = now() WHERE id = $1",
    )
    .bind(user_id)
    .execute(db)
    .await
    .context("complete onboarding")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taste_save_touches_only_taste_columns() {
        let set_clause = SAVE_TASTE_SQL
            .split("DO UPDATE")
            .nth(1)
            .expect("upsert has an update clause");
        for column in ["nutrition_balance", "cuisine_variety", "suggestions", "updated_at"] {
            assert!(set_clause.contains(&format!("{column} =")), "{column}");
        }
        for column in ["first_name", "cuisine_summary", "preferences", "onboarding_completed"] {
            assert!(!SAVE_TASTE_SQL.contains(column), "{column}");
        }
    }
}
