use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Pairs of directions that cancel each other out
const OPPOSITES: [(Direction, Direction); 4] = [
    (Direction::Up, Direction::Down),
    (Direction::Down, Direction::Up),
    (Direction::Left, Direction::Right),
    (Direction::Right, Direction::Left),
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction pointing the other way
    pub fn opposite(&self) -> Direction {
        OPPOSITES
            .iter()
            .find(|(from, _)| from == self)
            .map(|&(_, to)| to)
            .unwrap_or(*self)
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit vector (dx, dy) for this direction; y grows downwards
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}
