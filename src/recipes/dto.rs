use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::LikedRecipe;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRecipesRequest {
    pub ingredient_text: Option<String>,
    /// Fridge photo as a data URL or bare base64.
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Trims the name, which is the upsert key for liked recipes.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedRecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<LikedRecipe> for LikedRecipeResponse {
    fn from(r: LikedRecipe) -> Self {
        Self {
            id: r.id,
            name: r.recipe_name,
            ingredients: r.ingredients,
            missing_ingredients: r.missing_ingredients,
            instructions: r.instructions,
            created_at: r.created_at,
        }
    }
}
