use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the playfield, in playfield units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move `step` units in a direction
    pub fn stepped(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake from its segments, head first.
    ///
    /// Panics if `body` is empty; a snake always has a head.
    pub fn new(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "snake needs at least a head");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push `new_head` to the front; the tail is kept when growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a constructed snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Whether the session is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Terminal; carries what ended the game
    Ended(CollisionType),
}

/// Read-only view of a session handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub speed: u32,
    pub ended: bool,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the snake covers every food cell
    pub food: Option<Position>,
    pub score: u32,
    /// Ticks per second
    pub speed: u32,
    /// Ticks survived so far
    pub ticks: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a new running game state
    pub fn new(snake: Snake, food: impl Into<Option<Position>>, speed: u32) -> Self {
        Self {
            snake,
            food: food.into(),
            score: 0,
            speed,
            ticks: 0,
            status: GameStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_ended(&self) -> bool {
        !self.is_running()
    }

    /// Current heading of the snake
    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Request a new heading, applied from the next tick on.
    ///
    /// Reversals are ignored, as is any request once the game has ended.
    /// Returns whether the heading was taken.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.is_ended() || self.snake.direction.is_opposite(requested) {
            return false;
        }
        self.snake.direction = requested;
        true
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.body.clone(),
            food: self.food,
            score: self.score,
            speed: self.speed,
            ended: self.is_ended(),
        }
    }
}
