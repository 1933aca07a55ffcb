use serde::{Deserialize, Serialize};

use crate::preferences::Preferences;

pub const DEFAULT_COUNT: u32 = 5;
pub const MAX_COUNT: u32 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationsRequest {
    pub preferences: Option<Preferences>,
    pub count: Option<u32>,
}

/// One card as the model returns it from `generate_recommendations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendation {
    pub name: String,
    pub restaurant: String,
    pub cuisine: String,
    #[serde(default)]
    pub diet_safe: Vec<String>,
    pub price: String,
    pub eta: String,
    pub distance: String,
    pub total_price: String,
    pub why: String,
}

#[derive(Debug, Deserialize)]
pub struct ToolOutput {
    pub recommendations: Vec<RawRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCard {
    pub id: u32,
    pub name: String,
    pub restaurant: String,
    pub cuisine: String,
    pub diet_safe: Vec<String>,
    pub price: String,
    pub eta: String,
    pub distance: String,
    pub total_price: String,
    pub why: String,
    pub image: String,
    pub calories: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationCard>,
}
