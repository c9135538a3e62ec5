//! Chess rules engine behind a gamified business-learning board.
//!
//! `engine` holds the pure rules (move generation, legality, move
//! application). `session` and `lessons` wrap it for a single player, and
//! `api` serves it over HTTP.

pub mod api;
pub mod config;
pub mod engine;
pub mod lessons;
pub mod session;
