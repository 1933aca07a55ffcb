use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{Profile, TasteFields};
use crate::preferences::Preferences;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub nutrition_balance: Option<String>,
    pub cuisine_variety: Option<String>,
    pub suggestions: Option<String>,
    pub cuisine_summary: Option<String>,
    pub onboarding_completed: bool,
    pub preferences: Preferences,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            nutrition_balance: p.nutrition_balance,
            cuisine_variety: p.cuisine_variety,
            suggestions: p.suggestions,
            cuisine_summary: p.cuisine_summary,
            onboarding_completed: p.onboarding_completed,
            preferences: p.preferences.0,
            updated_at: p.updated_at,
        }
    }
}

/// PATCH body; absent fields stay, empty strings clear.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub nutrition_balance: Option<String>,
    pub cuisine_variety: Option<String>,
    pub suggestions: Option<String>,
    pub cuisine_summary: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.nutrition_balance.is_none()
            && self.cuisine_variety.is_none()
            && self.suggestions.is_none()
            && self.cuisine_summary.is_none()
    }

    pub fn apply_to(self, fields: &mut TasteFields) {
        fn set(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value {
                let v = v.trim();
                *slot = (!v.is_empty()).then(|| v.to_string());
            }
        }
        set(&mut fields.first_name, self.first_name);
        set(&mut fields.nutrition_balance, self.nutrition_balance);
        set(&mut fields.cuisine_variety, self.cuisine_variety);
        set(&mut fields.suggestions, self.suggestions);
        set(&mut fields.cuisine_summary, self.cuisine_summary);
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub preferences: Preferences,
    pub onboarding_completed: bool,
}
