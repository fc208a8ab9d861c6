// Library surface for the binary and for headless/integration tests.
// Presentation (ratatui widgets, key bindings) stays in the binary.
pub mod actor;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod game;
pub mod render;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod timer;
pub mod util;

pub use game::{Game, GameEvent, GameSettings, PauseMode, StrikeOutcome};
