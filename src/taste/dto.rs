use serde::{Deserialize, Serialize};

use crate::preferences::Preferences;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasteProfileRequest {
    /// Data URLs or bare base64 payloads.
    pub food_images: Vec<String>,
    pub allergies: Vec<String>,
    /// Persist the result into the caller's profile.
    pub save: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    pub nutrition_balance: String,
    pub cuisine_variety: String,
    pub suggestions: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}
