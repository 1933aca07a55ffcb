//! Deck swipes and the saved-restaurant favorites they produce.
//!
//! Right logs a dine-out meal, up saves a restaurant (or likes a recipe),
//! left skips.

pub mod dto;
pub mod handlers;
pub mod repo;
mod services;

pub use handlers::routes as router;
