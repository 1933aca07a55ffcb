use tracing::info;
use uuid::Uuid;

use super::{
    dto::{RestaurantCard, SwipeAction, SwipeCard, SwipeDirection, SwipeResponse},
    repo,
};
use crate::{
    error::AppError,
    history::{
        dto::MealType,
        money,
        repo::{self as history, NewMealEntry},
    },
    recipes::{dto::Recipe, repo as liked},
    state::AppState,
};

/// What a swipe turns into, decided before anything is written.
/// Names are already trimmed so every write path stores the same key.
#[derive(Debug, PartialEq)]
pub enum SwipePlan {
    LogDineout {
        card: RestaurantCard,
        expense_cents: i64,
    },
    SaveRestaurant {
        card: RestaurantCard,
        total_price_cents: Option<i64>,
    },
    LikeRecipe(Recipe),
    Skip,
}

pub fn plan(direction: SwipeDirection, card: SwipeCard) -> Result<SwipePlan, AppError> {
    let price_cents =
        |c: &RestaurantCard| c.total_price.as_deref().and_then(money::parse_price_cents);

    let card = match (direction, card) {
        (SwipeDirection::Left, _) => return Ok(SwipePlan::Skip),
        (_, card) => card.normalized(),
    };

    match (direction, card) {
        (_, SwipeCard::Restaurant(c)) if c.name.is_empty() || c.restaurant.is_empty() => {
            Err(AppError::bad_request("Card needs a dish and restaurant name"))
        }
        (SwipeDirection::Right, SwipeCard::Restaurant(c)) => match price_cents(&c) {
            Some(expense_cents) => Ok(SwipePlan::LogDineout {
                card: c,
                expense_cents,
            }),
            None => Err(AppError::bad_request(format!(
                "Unrecognized totalPrice: {:?}",
                c.total_price.as_deref().unwrap_or_default()
            ))),
        },
        (_, SwipeCard::Restaurant(c)) => Ok(SwipePlan::SaveRestaurant {
            total_price_cents: price_cents(&c),
            card: c,
        }),
        (_, SwipeCard::Recipe(r)) if r.name.is_empty() => {
            Err(AppError::bad_request("Recipe name is required"))
        }
        (_, SwipeCard::Recipe(r)) => Ok(SwipePlan::LikeRecipe(r)),
    }
}

pub async fn execute(
    state: &AppState,
    user_id: Uuid,
    plan: SwipePlan,
) -> Result<SwipeResponse, AppError> {
    let (action, id) = match plan {
        SwipePlan::Skip => (SwipeAction::Skipped, None),
        SwipePlan::LogDineout {
            card,
            expense_cents,
        } => {
            let entry = history::insert(
                &state.db,
                user_id,
                &NewMealEntry {
                    meal_type: MealType::Dineout,
                    meal_name: &card.name,
                    restaurant_name: Some(card.restaurant.as_str()),
                    expense_cents,
                },
            )
            .await?;
            (SwipeAction::Logged, Some(entry.id))
        }
        SwipePlan::SaveRestaurant {
            card,
            total_price_cents,
        } => {
            let saved = repo::upsert(&state.db, user_id, &card, total_price_cents).await?;
            (SwipeAction::Saved, Some(saved.id))
        }
        SwipePlan::LikeRecipe(recipe) => {
            let row = liked::upsert(&state.db, user_id, &recipe).await?;
            (SwipeAction::Liked, Some(row.id))
        }
    };
    info!(%user_id, ?action, "swipe handled");
    Ok(SwipeResponse { action, id })
}
