//! Service layer: lobby, match manager, and per-match runtimes.

pub mod game_runtime;
pub mod lobby;
pub mod manager;
pub mod messages;
