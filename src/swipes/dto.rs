use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::SavedRestaurant;
use crate::{history::money, recipes::dto::Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
}

/// A restaurant card as shown on the deck; unknown fields are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCard {
    pub name: String,
    pub restaurant: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RestaurantCard {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.restaurant = self.restaurant.trim().to_string();
        self.cuisine = self
            .cuisine
            .take()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SwipeCard {
    Restaurant(RestaurantCard),
    Recipe(Recipe),
}

impl SwipeCard {
    pub fn normalized(mut self) -> Self {
        match &mut self {
            SwipeCard::Restaurant(c) => c.normalize(),
            SwipeCard::Recipe(r) => r.normalize(),
        }
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
    pub card: SwipeCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Logged,
    Saved,
    Liked,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub action: SwipeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub dish_name: String,
    pub restaurant_name: String,
    pub cuisine: Option<String>,
    pub total_price: Option<f64>,
    pub card: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<SavedRestaurant> for FavoriteResponse {
    fn from(s: SavedRestaurant) -> Self {
        Self {
            id: s.id,
            dish_name: s.dish_name,
            restaurant_name: s.restaurant_name,
            cuisine: s.cuisine,
            total_price: s.total_price_cents.map(money::from_cents),
            card: s.card.0,
            created_at: s.created_at,
        }
    }
}
