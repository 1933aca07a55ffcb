use serde_json::json;
use tracing::debug;

use super::dto::{RawRecommendation, RecommendationCard, ToolOutput};
use crate::{
    llm::{ChatMessage, LlmClient, LlmError, ToolSpec},
    preferences::Preferences,
};

const SYSTEM_PROMPT: &str = "You are a food recommendation expert. Generate realistic, appealing \
restaurant recommendations in JSON format.";

const FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=800";

const CUISINE_IMAGES: &[(&str, &str)] = &[
    ("Asian", "https://images.unsplash.com/photo-1569718212165-3a8278d5f624?w=800"),
    ("Asian Fusion", "https://images.unsplash.com/photo-1569718212165-3a8278d5f624?w=800"),
    ("Italian", "https://images.unsplash.com/photo-1574071318508-1cdbab80d002?w=800"),
    ("Mexican", "https://images.unsplash.com/photo-1565299585323-38d6b0865b47?w=800"),
    ("American", "https://images.unsplash.com/photo-1550547660-d9450f859349?w=800"),
    ("Mediterranean", "https://images.unsplash.com/photo-1529006557810-274b9b2fc783?w=800"),
    ("Healthy", FALLBACK_IMAGE),
    ("Indian", "https://images.unsplash.com/photo-1565557623262-b51c2513a641?w=800"),
    ("Japanese", "https://images.unsplash.com/photo-1579584425555-c3ce17fd4351?w=800"),
    ("Thai", "https://images.unsplash.com/photo-1559314809-0d155014e29e?w=800"),
];

/// Card photo by exact cuisine name.
pub fn image_for_cuisine(cuisine: &str) -> &'static str {
    CUISINE_IMAGES
        .iter()
        .find(|(name, _)| *name == cuisine)
        .map(|(_, url)| *url)
        .unwrap_or(FALLBACK_IMAGE)
}

pub fn calories_for_price(price: &str) -> &'static str {
    match price {
        "$" => "~400-600 cal",
        "$$" => "~550-750 cal",
        "$$$" => "~700-900 cal",
        _ => "~550 cal",
    }
}

pub fn recommendations_prompt(prefs: &Preferences, count: u32) -> String {
    let cuisines = prefs
        .cuisine_variety
        .as_deref()
        .or(prefs.cuisine_summary.as_deref())
        .unwrap_or("varied cuisines");
    let allergies = prefs.allergy_list().unwrap_or_else(|| "none".into());
    let context = prefs.dining_context.map(|c| c.as_str()).unwrap_or("casual");
    let priority = prefs.priority.map(|p| p.as_str()).unwrap_or("comfort");
    let budget = prefs.budget_or_default();
    let travel = prefs.travel_time_or_default();
    let constraints = serde_json::to_string(&prefs.constraints).unwrap_or_else(|_| "[]".into());

    format!(
        "Generate {count} realistic restaurant meal recommendations based on these user preferences:

Cuisine Preferences: {cuisines}
Allergies/Restrictions: {allergies}
Dining Context: {context}
Priority: {priority}
Budget: ${budget} per meal
Max Travel Time: {travel} minutes
Additional Constraints: {constraints}

Generate diverse, realistic restaurant recommendations that match these preferences. For each recommendation, provide:
- Dish name (creative but realistic)
- Restaurant name
- Cuisine type
- Dietary safety info (must avoid: {allergies})
- Price range ($, $$, or $$$)
- Estimated delivery time (in minutes, under {travel} min)
- Distance (in miles, realistic for delivery)
- Total price (realistic, within budget)
- Why this matches their preferences

Make the recommendations diverse in cuisine types and appealing. Use realistic restaurant and dish names."
    )
}

fn recommendations_tool() -> ToolSpec {
    ToolSpec {
        name: "generate_recommendations",
        description: "Generate restaurant meal recommendations",
        parameters: json!({
            "type": "object",
            "properties": {
                "recommendations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Dish name" },
                            "restaurant": { "type": "string", "description": "Restaurant name" },
                            "cuisine": { "type": "string", "description": "Cuisine type" },
                            "dietSafe": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "Dietary accommodations"
                            },
                            "price": {
                                "type": "string",
                                "enum": ["$", "$$", "$$$"],
                                "description": "Price range indicator"
                            },
                            "eta": { "type": "string", "description": "Estimated delivery time like '15 min'" },
                            "distance": { "type": "string", "description": "Distance like '0.8 mi'" },
                            "totalPrice": { "type": "string", "description": "Total price like '$16.50'" },
                            "why": { "type": "string", "description": "Why this matches their preferences" }
                        },
                        "required": ["name", "restaurant", "cuisine", "dietSafe", "price", "eta", "distance", "totalPrice", "why"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["recommendations"],
            "additionalProperties": false
        }),
    }
}

/// Truncates to `count` and decorates each card with id, image and calories.
pub fn normalize(raw: Vec<RawRecommendation>, count: u32) -> Vec<RecommendationCard> {
    raw.into_iter()
        .take(count as usize)
        .zip(1..)
        .map(|(r, id)| RecommendationCard {
            id,
            image: image_for_cuisine(&r.cuisine).to_string(),
            calories: calories_for_price(&r.price).to_string(),
            name: r.name,
            restaurant: r.restaurant,
            cuisine: r.cuisine,
            diet_safe: r.diet_safe,
            price: r.price,
            eta: r.eta,
            distance: r.distance,
            total_price: r.total_price,
            why: r.why,
        })
        .collect()
}

pub async fn generate(
    llm: &dyn LlmClient,
    prefs: &Preferences,
    count: u32,
) -> Result<Vec<RecommendationCard>, LlmError> {
    let args = llm
        .call_tool(
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(recommendations_prompt(prefs, count)),
            ],
            &recommendations_tool(),
        )
        .await?;

    let out: ToolOutput =
        serde_json::from_value(args).map_err(|e| LlmError::Parse(e.to_string()))?;
    debug!(returned = out.recommendations.len(), count, "recommendations received");
    Ok(normalize(out.recommendations, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{Constraint, Priority};

    fn raw(cuisine: &str, price: &str) -> RawRecommendation {
        RawRecommendation {
            name: "Pad See Ew".into(),
            restaurant: "Bangkok Street".into(),
            cuisine: cuisine.into(),
            diet_safe: vec!["Nut-free".into()],
            price: price.into(),
            eta: "15 min".into(),
            distance: "0.8 mi".into(),
            total_price: "$16.50".into(),
            why: "You like noodles.".into(),
        }
    }

    #[test]
    fn images_fall_back_to_healthy() {
        assert_eq!(
            image_for_cuisine("Thai"),
            "https://images.unsplash.com/photo-1559314809-0d155014e29e?w=800"
        );
        assert_eq!(image_for_cuisine("Ethiopian"), image_for_cuisine("Healthy"));
        assert_eq!(image_for_cuisine("thai"), FALLBACK_IMAGE);
    }

    #[test]
    fn calories_follow_price_tier() {
        assert_eq!(calories_for_price("$"), "~400-600 cal");
        assert_eq!(calories_for_price("$$"), "~550-750 cal");
        assert_eq!(calories_for_price("$$$"), "~700-900 cal");
        assert_eq!(calories_for_price("$$$$"), "~550 cal");
    }

    #[test]
    fn normalize_truncates_and_numbers_from_one() {
        let cards = normalize(
            vec![raw("Thai", "$"), raw("Italian", "$$"), raw("Peruvian", "$$$")],
            2,
        );
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, 1);
        assert_eq!(cards[1].id, 2);
        assert_eq!(cards[1].calories, "~550-750 cal");
        assert_eq!(cards[1].image, image_for_cuisine("Italian"));
    }

    #[test]
    fn card_serializes_camel_case() {
        let card = normalize(vec![raw("Thai", "$")], 1).remove(0);
        let v = serde_json::to_value(&card).unwrap();
        assert_eq!(v["dietSafe"][0], "Nut-free");
        assert_eq!(v["totalPrice"], "$16.50");
        assert!(v.get("diet_safe").is_none());
    }

    #[test]
    fn prompt_uses_defaults_and_constraints() {
        let p = recommendations_prompt(&Preferences::default(), 5);
        assert!(p.starts_with("Generate 5 realistic"));
        assert!(p.contains("Cuisine Preferences: varied cuisines"));
        assert!(p.contains("Allergies/Restrictions: none"));
        assert!(p.contains("Priority: comfort"));
        assert!(p.contains("Budget: $50 per meal"));
        assert!(p.contains("under 30 min"));
        assert!(p.contains("Additional Constraints: []"));

        let prefs = Preferences {
            priority: Some(Priority::Cuisine),
            constraints: vec![Constraint::Budget, Constraint::Vegan],
            travel_time: Some(10),
            ..Default::default()
        };
        let p = recommendations_prompt(&prefs, 3);
        assert!(p.contains("Priority: cuisine"));
        assert!(p.contains(r#"Additional Constraints: ["budget","vegan"]"#));
        assert!(p.contains("Max Travel Time: 10 minutes"));
    }
}
