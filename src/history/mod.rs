//! Meal history and expense tracking.

pub mod dto;
pub mod handlers;
pub mod money;
pub mod repo;
mod services;

pub use handlers::routes as router;
