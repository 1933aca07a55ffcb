//! Recipe generation from ingredients or a fridge photo, and liked recipes.

pub mod dto;
pub mod handlers;
pub mod repo;
mod services;

pub use handlers::routes as router;
