use super::{
    config::GameConfig,
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Rejected rolls per food cell before falling back to a scan of free cells
const ROLLS_PER_CELL: usize = 4;

/// Information about a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the speed went up, so the tick timer needs rescheduling
    pub speed_changed: bool,
    /// Where the food went, if it relocated; stays `None` when the snake
    /// ate the last free food cell
    pub new_food: Option<Position>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Snake segments after the tick, head first
    pub snake: Vec<Position>,
    pub score: u32,
    pub speed: u32,
    /// Whether the game has ended
    pub terminated: bool,
    /// Additional information about the tick
    pub info: TickInfo,
}

impl TickResult {
    fn new(state: &GameState, info: TickInfo) -> Self {
        Self {
            snake: state.snake.body.clone(),
            score: state.score,
            speed: state.speed,
            terminated: state.is_ended(),
            info,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh session
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            self.config.initial_snake.clone(),
            self.config.initial_direction,
        );
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.initial_speed)
    }

    /// Advance the game by one step
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if let GameStatus::Ended(collision) = state.status {
            return TickResult::new(
                state,
                TickInfo {
                    ate_food: false,
                    speed_changed: false,
                    new_food: None,
                    collision_type: Some(collision),
                },
            );
        }

        // Read the heading once so the whole tick sees the same value
        let direction = state.snake.direction;
        let new_head = state.snake.head().stepped(direction, self.config.step);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.status = GameStatus::Ended(collision_type);
            debug!(
                "{:?} at {:?} after {} ticks",
                collision_type, new_head, state.ticks
            );

            return TickResult::new(
                state,
                TickInfo {
                    ate_food: false,
                    speed_changed: false,
                    new_food: None,
                    collision_type: Some(collision_type),
                },
            );
        }

        let ate_food = state.food == Some(new_head);
        state.snake.advance(new_head, ate_food);
        state.ticks += 1;

        let mut speed_changed = false;
        let mut new_food = None;

        if ate_food {
            state.score += 1;

            if state.score % self.config.points_per_speed_up.max(1) == 0 {
                state.speed += 1;
                speed_changed = true;
                info!("score {} reached, speed is now {}", state.score, state.speed);
            }

            state.food = self.place_food(&state.snake);
            new_food = state.food;
        }

        TickResult::new(
            state,
            TickInfo {
                ate_food,
                speed_changed,
                new_food,
                collision_type: None,
            },
        )
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !self.config.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Every current segment counts, the tail included
        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random food cell that the snake does not cover.
    ///
    /// Rolls uniformly over the food cells and retries on a hit. After a
    /// bounded number of misses it picks uniformly among the remaining free
    /// cells instead, so a crowded board cannot stall the tick. Returns `None`
    /// when the snake covers every food cell.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let (first_column, last_column) = self.config.food_columns;
        let (first_row, last_row) = self.config.food_rows;
        let max_rolls = self.config.food_cell_count() * ROLLS_PER_CELL;

        for _ in 0..max_rolls {
            let column = self.rng.gen_range(first_column..=last_column);
            let row = self.rng.gen_range(first_row..=last_row);
            let pos = Position::new(column * self.config.step, row * self.config.step);

            if !snake.occupies(pos) {
                debug!("food placed at {:?}", pos);
                return Some(pos);
            }
        }

        let free: Vec<Position> = self
            .config
            .food_cells()
            .filter(|&cell| !snake.occupies(cell))
            .collect();

        let pos = free.choose(&mut self.rng).copied();
        match pos {
            Some(pos) => debug!("food placed at {:?} after scanning free cells", pos),
            None => warn!("no free cell left for food"),
        }
        pos
    }
}
