//! Photo-based taste profiles and free-text preference analysis.

mod dto;
pub mod handlers;
mod services;

pub use handlers::routes as router;
