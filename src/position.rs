use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::SnakeError;
use Direction::*;

/// A grid cell, or a step between cells. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, other: Position) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Position {
    fn sub_assign(&mut self, other: Position) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

pub const UP: Position = Position::new(0, -1);
pub const DOWN: Position = Position::new(0, 1);
pub const LEFT: Position = Position::new(-1, 0);
pub const RIGHT: Position = Position::new(1, 0);

/// The only four ways a snake may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn vector(self) -> Position {
        match self {
            Up => UP,
            Down => DOWN,
            Left => LEFT,
            Right => RIGHT,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

impl TryFrom<Position> for Direction {
    type Error = SnakeError;

    fn try_from(v: Position) -> Result<Self, Self::Error> {
        match (v.x, v.y) {
            (0, -1) => Ok(Up),
            (0, 1) => Ok(Down),
            (-1, 0) => Ok(Left),
            (1, 0) => Ok(Right),
            (x, y) => Err(SnakeError::InvalidDirection { x, y }),
        }
    }
}
