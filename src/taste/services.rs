use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use tracing::{debug, warn};

use super::dto::TasteProfile;
use crate::{
    llm::{ChatMessage, ContentPart, LlmClient, LlmError, ToolSpec},
    preferences::Preferences,
};

const TASTE_SYSTEM_PROMPT: &str = "You are a friendly nutritionist analyzing food images to provide \
personalized taste insights. IMPORTANT: Always address the person directly using 'you' and 'your' - \
never refer to them as 'the user'. Write as if you're speaking directly to them in a warm, personal way.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You are a thoughtful food recommendation expert who understands \
nuanced preferences and provides personalized insights.";

/// Returned when the caller has no photos yet; no model call is made.
pub fn default_taste_profile() -> TasteProfile {
    TasteProfile {
        nutrition_balance: "We'll learn more about your nutrition preferences as you add food photos \
and interact with the app."
            .into(),
        cuisine_variety: "Share some photos of your favorite foods to help us understand your cuisine \
preferences better."
            .into(),
        suggestions: "Start by uploading photos of meals you enjoy to get personalized \
recommendations tailored to your taste."
            .into(),
    }
}

/// Strips any `data:image/<x>;base64,` prefix and re-wraps as JPEG data URL.
pub fn to_jpeg_data_url(image: &str) -> String {
    lazy_static! {
        static ref DATA_URL_PREFIX: Regex = Regex::new(r"^data:image/[a-z]+;base64,").unwrap();
    }
    let payload = DATA_URL_PREFIX.replace(image.trim(), "");
    format!("data:image/jpeg;base64,{payload}")
}

pub fn taste_prompt(allergies: &[String]) -> String {
    let mut prompt = String::from("Analyze these food images and create a personalized taste profile. ");
    if !allergies.is_empty() {
        prompt.push_str(&format!(
            "The user has allergies to: {}. ",
            allergies.join(", ")
        ));
    }
    prompt.push_str("Based on the foods shown, provide detailed insights about their taste preferences.");
    prompt
}

fn taste_tool() -> ToolSpec {
    ToolSpec {
        name: "create_taste_profile",
        description: "Generate a structured taste profile with nutrition, variety, and suggestions based on food images",
        parameters: json!({
            "type": "object",
            "properties": {
                "nutrition_balance": {
                    "type": "string",
                    "description": "2-3 sentences analyzing their nutritional balance and dietary patterns. Must start naturally without phrases like 'The user' or 'You have'. Example: 'You enjoy a balanced mix of proteins and carbs...' or 'Your meals show a preference for...'"
                },
                "cuisine_variety": {
                    "type": "string",
                    "description": "2-3 sentences about the variety and types of cuisines they enjoy. Must use 'you' language. Example: 'You seem to enjoy a mix of classic American cuisine...' or 'Your taste leans towards...'"
                },
                "suggestions": {
                    "type": "string",
                    "description": "2-3 sentences with personalized recommendations. Must address them directly with 'you'. Example: 'To add more variety, you might try...' or 'Consider exploring...' Never start with 'Given the user' or similar phrases."
                }
            },
            "required": ["nutrition_balance", "cuisine_variety", "suggestions"],
            "additionalProperties": false
        }),
    }
}

pub async fn generate_taste_profile(
    llm: &dyn LlmClient,
    food_images: &[String],
    allergies: &[String],
) -> Result<TasteProfile, LlmError> {
    let images: Vec<&String> = food_images.iter().filter(|i| !i.trim().is_empty()).collect();
    if images.is_empty() {
        debug!("no food images, returning default taste profile");
        return Ok(default_taste_profile());
    }

    let mut parts = Vec::with_capacity(images.len() + 1);
    parts.push(ContentPart::text(taste_prompt(allergies)));
    parts.extend(images.iter().map(|i| ContentPart::image(to_jpeg_data_url(i))));
    debug!(images = images.len(), "sending food images for taste analysis");

    let args = llm
        .call_tool(
            vec![
                ChatMessage::system(TASTE_SYSTEM_PROMPT),
                ChatMessage::user_parts(parts),
            ],
            &taste_tool(),
        )
        .await?;

    let profile: TasteProfile =
        serde_json::from_value(args).map_err(|e| LlmError::Parse(e.to_string()))?;

    if profile.nutrition_balance.trim().is_empty()
        || profile.cuisine_variety.trim().is_empty()
        || profile.suggestions.trim().is_empty()
    {
        warn!("taste profile is missing required fields");
        return Err(LlmError::Parse("profile is missing required fields".into()));
    }
    Ok(profile)
}

pub fn analysis_prompt(prefs: &Preferences) -> String {
    let allergies = prefs.allergy_list().unwrap_or_else(|| "None".into());
    let taste = prefs
        .cuisine_summary
        .as_deref()
        .or(prefs.cuisine_variety.as_deref())
        .unwrap_or("Diverse palate");
    let context = prefs
        .dining_context
        .map(|c| c.as_str())
        .unwrap_or("Casual dining");
    let priority = prefs
        .priority
        .map(|p| p.as_str())
        .unwrap_or("Balanced experience");
    let vegan = if prefs.is_vegan() { "Yes" } else { "No" };

    format!(
        "You are a food recommendation AI analyzing a user's preferences. Generate a detailed, personalized thinking process based on their profile:

User Profile:
- Dietary restrictions: {allergies}
- Taste preference: {taste}
- Context: {context}
- Priority: {priority}
- Budget: ${budget}
- Max travel time: {travel} minutes
- Vegan/Vegetarian: {vegan}

Generate a warm, personalized analysis (2-3 paragraphs) explaining:
1. What you understand about their taste preferences
2. How their constraints (budget, time, dietary needs) shape recommendations
3. What type of dining experiences would match their current mood/context

Write in a friendly, conversational tone as if you're a food expert advisor. Be specific and thoughtful.",
        budget = prefs.budget_or_default(),
        travel = prefs.travel_time_or_default(),
    )
}

pub async fn analyze_preferences(
    llm: &dyn LlmClient,
    prefs: &Preferences,
) -> Result<String, LlmError> {
    let analysis = llm
        .complete(vec![
            ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
            ChatMessage::user(analysis_prompt(prefs)),
        ])
        .await?;
    let analysis = analysis.trim();
    if analysis.is_empty() {
        return Err(LlmError::Parse("empty analysis".into()));
    }
    Ok(analysis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{fake::FakeLlm, MessageContent};
    use crate::preferences::{Constraint, DiningContext, Priority};

    #[test]
    fn data_url_prefix_is_normalized_to_jpeg() {
        assert_eq!(
            to_jpeg_data_url("data:image/png;base64,iVBOR"),
            "data:image/jpeg;base64,iVBOR"
        );
        assert_eq!(to_jpeg_data_url("/9j/4AAQ"), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn taste_prompt_mentions_allergies_only_when_present() {
        assert!(!taste_prompt(&[]).contains("allergies"));
        let p = taste_prompt(&["peanuts".into(), "shellfish".into()]);
        assert!(p.contains("allergies to: peanuts, shellfish."));
    }

    #[test]
    fn tool_fields_forbid_third_person_openers() {
        let tool = taste_tool();
        let props = &tool.parameters["properties"];
        let nutrition = props["nutrition_balance"]["description"].as_str().unwrap();
        assert!(nutrition.contains("without phrases like 'The user'"));
        let variety = props["cuisine_variety"]["description"].as_str().unwrap();
        assert!(variety.contains("Must use 'you' language"));
        let suggestions = props["suggestions"]["description"].as_str().unwrap();
        assert!(suggestions.contains("Never start with 'Given the user'"));
    }

    #[tokio::test]
    async fn no_images_returns_default_without_calling_model() {
        let llm = FakeLlm::default();
        let profile = generate_taste_profile(&llm, &["  ".into()], &[]).await.unwrap();
        assert_eq!(profile, default_taste_profile());
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn images_are_sent_after_the_prompt() {
        let llm = FakeLlm::with_tool(
            "create_taste_profile",
            json!({
                "nutrition_balance": "You balance protein and carbs.",
                "cuisine_variety": "Your taste leans towards Thai.",
                "suggestions": "You might try Lao food."
            }),
        );
        let profile = generate_taste_profile(&llm, &["data:image/webp;base64,AAA".into()], &[])
            .await
            .unwrap();
        assert_eq!(profile.cuisine_variety, "Your taste leans towards Thai.");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0][1].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[1], ContentPart::image("data:image/jpeg;base64,AAA"));
            }
            other => panic!("expected parts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_profile_field_is_rejected() {
        let llm = FakeLlm::with_tool(
            "create_taste_profile",
            json!({ "nutrition_balance": "x", "cuisine_variety": " ", "suggestions": "y" }),
        );
        let err = generate_taste_profile(&llm, &["AAA".into()], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn analysis_prompt_uses_defaults() {
        let p = analysis_prompt(&Preferences::default());
        assert!(p.contains("- Dietary restrictions: None"));
        assert!(p.contains("- Taste preference: Diverse palate"));
        assert!(p.contains("- Context: Casual dining"));
        assert!(p.contains("- Budget: $50"));
        assert!(p.contains("- Max travel time: 30 minutes"));
        assert!(p.contains("- Vegan/Vegetarian: No"));
    }

    #[test]
    fn analysis_prompt_uses_stored_values() {
        let prefs = Preferences {
            allergies: vec!["gluten".into()],
            cuisine_summary: Some("You love bold, spicy food.".into()),
            dining_context: Some(DiningContext::Special),
            priority: Some(Priority::New),
            budget: Some(80),
            constraints: vec![Constraint::Vegan],
            ..Default::default()
        };
        let p = analysis_prompt(&prefs);
        assert!(p.contains("- Dietary restrictions: gluten"));
        assert!(p.contains("- Taste preference: You love bold, spicy food."));
        assert!(p.contains("- Context: special"));
        assert!(p.contains("- Priority: new"));
        assert!(p.contains("- Budget: $80"));
        assert!(p.contains("- Vegan/Vegetarian: Yes"));
    }

    #[tokio::test]
    async fn empty_analysis_is_an_error() {
        let llm = FakeLlm::with_text("   ");
        let err = analyze_preferences(&llm, &Preferences::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
