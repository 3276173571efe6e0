use std::time::Duration;

use serde::Serialize;

use super::direction::Direction;
use super::state::Position;

/// Playfield geometry and progression rules for a game session.
///
/// Coordinates are in playfield units, not cells: every valid position is a
/// multiple of `step`. The defaults reproduce the classic 600x620 layout with
/// a 20 unit score bar along the top edge. The config is built in code
/// only; `initial_snake` must not be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameConfig {
    /// Distance between adjacent cells
    pub step: i32,
    /// A head at or left of this x has hit the left wall
    pub min_x: i32,
    /// A head at or right of this x has hit the right wall
    pub max_x: i32,
    /// A head at or above this y has hit the top wall (below the score bar)
    pub min_y: i32,
    /// A head at or below this y has hit the bottom wall
    pub max_y: i32,
    /// Inclusive column range food may spawn in
    pub food_columns: (i32, i32),
    /// Inclusive row range food may spawn in
    pub food_rows: (i32, i32),
    /// Starting body, head first
    pub initial_snake: Vec<Position>,
    pub initial_direction: Direction,
    /// Ticks per second at the start of a game
    pub initial_speed: u32,
    /// Speed goes up by one every time the score reaches a multiple of this
    pub points_per_speed_up: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            step: 20,
            min_x: 0,
            max_x: 600,
            min_y: 20,
            max_y: 620,
            food_columns: (1, 29),
            food_rows: (3, 30),
            initial_snake: vec![
                Position::new(100, 100),
                Position::new(80, 100),
                Position::new(60, 100),
            ],
            initial_direction: Direction::Right,
            initial_speed: 15,
            points_per_speed_up: 5,
        }
    }
}

impl GameConfig {
    /// Check if a head at `pos` is still strictly inside the walls
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x > self.min_x && pos.x < self.max_x && pos.y > self.min_y && pos.y < self.max_y
    }

    /// Time between ticks at the given speed (1000ms / speed, integer division)
    pub fn tick_interval(&self, speed: u32) -> Duration {
        Duration::from_millis(1000 / u64::from(speed.max(1)))
    }

    /// Number of cells food can be placed on
    pub fn food_cell_count(&self) -> usize {
        let columns = (self.food_columns.1 - self.food_columns.0 + 1).max(0) as usize;
        let rows = (self.food_rows.1 - self.food_rows.0 + 1).max(0) as usize;
        columns * rows
    }

    /// Iterate over every cell food can be placed on, row by row
    pub fn food_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.food_rows.0..=self.food_rows.1).flat_map(move |row| {
            (self.food_columns.0..=self.food_columns.1)
                .map(move |column| Position::new(column * self.step, row * self.step))
        })
    }

    /// One-line JSON rendering, written to the log at startup
    pub fn summary(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Number of cells a head can occupy horizontally
    pub fn columns(&self) -> i32 {
        (self.max_x - self.min_x) / self.step - 1
    }

    /// Number of cells a head can occupy vertically
    pub fn rows(&self) -> i32 {
        (self.max_y - self.min_y) / self.step - 1
    }
}
