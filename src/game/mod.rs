//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A session can be driven headlessly, one tick at a time, which is how the tests use it.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickInfo, TickResult};
pub use state::{CollisionType, GameState, GameStatus, Position, Snake, Snapshot};
