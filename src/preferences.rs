//! Taste preferences collected by the onboarding wizard.
//!
//! Stored as JSON on the profile row and fed into every prompt.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BUDGET: u32 = 50;
pub const DEFAULT_TRAVEL_TIME: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiningContext {
    Home,
    Special,
    Casual,
}

impl DiningContext {
    pub fn as_str(self) -> &'static str {
        match self {
            DiningContext::Home => "home",
            DiningContext::Special => "special",
            DiningContext::Casual => "casual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Try something new.
    New,
    Comfort,
    /// Explore a specific cuisine.
    Cuisine,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::New => "new",
            Priority::Comfort => "comfort",
            Priority::Cuisine => "cuisine",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    Time,
    Budget,
    Calorie,
    Allergy,
    Vegan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub name: Option<String>,
    pub favorite_foods: Vec<String>,
    pub allergies: Vec<String>,
    pub dining_context: Option<DiningContext>,
    pub priority: Option<Priority>,
    pub constraints: Vec<Constraint>,
    pub budget: Option<u32>,
    pub travel_time: Option<u32>,
    pub vegan: bool,
    pub cuisine_summary: Option<String>,
    pub cuisine_variety: Option<String>,
}

impl Preferences {
    pub fn budget_or_default(&self) -> u32 {
        self.budget.unwrap_or(DEFAULT_BUDGET)
    }

    pub fn travel_time_or_default(&self) -> u32 {
        self.travel_time.unwrap_or(DEFAULT_TRAVEL_TIME)
    }

    /// Allergies joined with ", ", or `None` when there are none.
    pub fn allergy_list(&self) -> Option<String> {
        if self.allergies.is_empty() {
            None
        } else {
            Some(self.allergies.join(", "))
        }
    }

    /// Vegan is implied by either the explicit flag or the wizard constraint.
    pub fn is_vegan(&self) -> bool {
        self.vegan || self.constraints.contains(&Constraint::Vegan)
    }

    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(name) = patch.name {
            self.name = non_empty(name);
        }
        if let Some(foods) = patch.favorite_foods {
            self.favorite_foods = clean_list(foods);
        }
        if let Some(allergies) = patch.allergies {
            self.allergies = clean_list(allergies);
        }
        if let Some(ctx) = patch.dining_context {
            self.dining_context = ctx;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(constraints) = patch.constraints {
            self.constraints.clear();
            for c in constraints {
                if !self.constraints.contains(&c) {
                    self.constraints.push(c);
                }
            }
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(travel_time) = patch.travel_time {
            self.travel_time = travel_time;
        }
        if let Some(vegan) = patch.vegan {
            self.vegan = vegan;
        }
        if let Some(summary) = patch.cuisine_summary {
            self.cuisine_summary = non_empty(summary);
        }
        if let Some(variety) = patch.cuisine_variety {
            self.cuisine_variety = non_empty(variety);
        }
    }
}

/// Partial update; absent fields are left as they are.
///
/// For the optional enum/number fields, `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferencesPatch {
    pub name: Option<String>,
    pub favorite_foods: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    #[serde(deserialize_with = "double_option")]
    pub dining_context: Option<Option<DiningContext>>,
    #[serde(deserialize_with = "double_option")]
    pub priority: Option<Option<Priority>>,
    pub constraints: Option<Vec<Constraint>>,
    #[serde(deserialize_with = "double_option")]
    pub budget: Option<Option<u32>>,
    #[serde(deserialize_with = "double_option")]
    pub travel_time: Option<Option<u32>>,
    pub vegan: Option<bool>,
    pub cuisine_summary: Option<String>,
    pub cuisine_variety: Option<String>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items.into_iter().filter_map(non_empty) {
        if !out.iter().any(|o| o.eq_ignore_ascii_case(&item)) {
            out.push(item);
        }
    }
    out
}
