use tracing::{debug, warn};

use super::dto::{Recipe, RecipesResponse};
use crate::llm::{extract_json_block, ChatMessage, ContentPart, LlmClient, LlmError};

const CHEF_PROMPT: &str = "You are a professional chef. Analyze the provided ingredients and \
generate 3 creative, practical recipes.";

const FORMAT_PROMPT: &str = "\n\nFor each recipe, provide:\n1. Recipe name\n2. List of ingredients \
(mark any missing ingredients)\n3. Step-by-step instructions\n\nFormat your response as JSON with \
this structure:\n{\n  \"recipes\": [\n    {\n      \"name\": \"Recipe Name\",\n      \
\"ingredients\": [\"ingredient 1\", \"ingredient 2\"],\n      \"missingIngredients\": \
[\"missing ingredient 1\"],\n      \"instructions\": [\"step 1\", \"step 2\"]\n    }\n  ]\n}";

fn image_url(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") || image.starts_with("http") {
        image.to_string()
    } else {
        format!("data:image/jpeg;base64,{image}")
    }
}

/// Prompt parts: instructions (plus photo when present), then the JSON format.
pub fn build_content(ingredient_text: Option<&str>, image_data: Option<&str>) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(3);
    match image_data {
        Some(image) => {
            let mut text = format!(
                "{CHEF_PROMPT} The user has provided a photo of their fridge. Identify all visible \
ingredients and use them."
            );
            if let Some(extra) = ingredient_text {
                text.push_str(&format!("\n\nAdditional ingredients mentioned: {extra}"));
            }
            parts.push(ContentPart::text(text));
            parts.push(ContentPart::image(image_url(image)));
        }
        None => parts.push(ContentPart::text(format!(
            "{CHEF_PROMPT}\n\nAvailable ingredients: {}",
            ingredient_text.unwrap_or_default()
        ))),
    }
    parts.push(ContentPart::text(FORMAT_PROMPT));
    parts
}

pub fn fallback_recipes(ingredient_text: Option<&str>) -> Vec<Recipe> {
    let ingredients = match ingredient_text {
        Some(text) => text.split(',').map(|i| i.trim().to_string()).collect(),
        None => vec!["Check your ingredients".to_string()],
    };
    vec![Recipe {
        name: "Quick Recipe Suggestion".into(),
        ingredients,
        missing_ingredients: Vec::new(),
        instructions: vec![
            "Due to a parsing error, please try again or adjust your ingredient list.".into(),
            "Make sure to provide clear ingredient names.".into(),
        ],
    }]
}

/// Parses the model reply; anything unparseable yields the fallback recipe.
pub fn parse_recipes(reply: &str, ingredient_text: Option<&str>) -> Vec<Recipe> {
    match serde_json::from_str::<RecipesResponse>(extract_json_block(reply)) {
        Ok(parsed) => parsed.recipes,
        Err(e) => {
            warn!(error = %e, "failed to parse recipe JSON, using fallback");
            fallback_recipes(ingredient_text)
        }
    }
}

pub async fn generate(
    llm: &dyn LlmClient,
    ingredient_text: Option<&str>,
    image_data: Option<&str>,
) -> Result<Vec<Recipe>, LlmError> {
    debug!(
        has_text = ingredient_text.is_some(),
        has_image = image_data.is_some(),
        "generating recipes"
    );
    let reply = llm
        .complete(vec![ChatMessage::user_parts(build_content(
            ingredient_text,
            image_data,
        ))])
        .await?;
    Ok(parse_recipes(&reply, ingredient_text))
}
