//! Restaurant meal cards for the discover deck.

pub mod dto;
pub mod handlers;
mod services;

pub use handlers::routes as router;
