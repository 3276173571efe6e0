//! Snake - a single-player snake game for the terminal
//!
//! This library provides:
//! - Core game logic, headless and deterministic under a seed (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering of game snapshots (render module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
