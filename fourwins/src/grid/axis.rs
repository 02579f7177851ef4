use serde::{Deserialize, Serialize};

/// One of the eight neighbouring directions of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthEast,
    SouthWest,
    NorthWest,
    SouthEast,
}

impl Direction {
    /// The `(column, row)` step of this direction. North is towards higher rows.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }
}

/// A line through a cell, given as a pair of opposite directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axis {
    pub from: Direction,
    pub to: Direction,
}

impl Axis {
    pub const VERTICAL: Axis = Axis::from_to(Direction::North, Direction::South);
    pub const HORIZONTAL: Axis = Axis::from_to(Direction::West, Direction::East);
    pub const DIAGONAL: Axis = Axis::from_to(Direction::SouthWest, Direction::NorthEast);
    pub const ANTI_DIAGONAL: Axis = Axis::from_to(Direction::NorthWest, Direction::SouthEast);

    /// The axes checked after every insert, in this order.
    pub const ALL: [Axis; 4] = [
        Axis::VERTICAL,
        Axis::HORIZONTAL,
        Axis::DIAGONAL,
        Axis::ANTI_DIAGONAL,
    ];

    const fn from_to(from: Direction, to: Direction) -> Self {
        Self { from, to }
    }
}
