use std::convert::TryFrom;

use tracing::trace;

use crate::config::{START_DIRECTION, START_HEAD, START_LENGTH};
use crate::error::{Result, SnakeError};
use crate::position::{Direction::{self, *}, Position};

/// What a single step did to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub new_head: Position,
    pub old_head: Position,
    /// The cell the tail left, `None` when the snake grew instead.
    pub old_tail: Option<Position>,
    /// False when the requested direction was a reversal; nothing moved.
    pub accepted: bool,
}

/// Segments are stored head first and are plain values, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
}

impl Snake {
    /// Three segments laid out horizontally in the middle of the grid, facing right.
    pub fn new() -> Self {
        let back = START_DIRECTION.opposite().vector();
        let body = (0..START_LENGTH)
            .map(|i| START_HEAD + Position::new(back.x * i, back.y * i))
            .collect();

        Snake { body, direction: START_DIRECTION }
    }

    pub fn from_body(body: Vec<Position>, direction: Direction) -> Result<Self> {
        if body.is_empty() {
            return Err(SnakeError::EmptyBody);
        }

        Ok(Snake { body, direction })
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Moves one cell. A request to reverse is dropped entirely: the body, the
    /// heading and `grow` are all left alone. With `grow` the old tail cell is
    /// kept as a new segment.
    pub fn move_step(&mut self, dir: Direction, grow: bool) -> MoveResult {
        if self.direction.is_opposite(dir) {
            let head = self.body[0];
            trace!(%head, ?dir, "reversal ignored");
            return MoveResult { new_head: head, old_head: head, old_tail: None, accepted: false };
        }
        self.direction = dir;

        let old_len = self.body.len();
        let old_head = self.body[0];
        let old_tail = self.body[old_len - 1];

        if grow {
            self.body.push(old_tail);
        }

        // Tail to head, so every predecessor is read before it is overwritten
        for idx in (1..old_len).rev() {
            self.body[idx] = self.body[idx - 1];
        }

        self.body[0] += self.direction.vector();
        let new_head = self.body[0];

        trace!(%old_head, %new_head, grow, "snake moved");

        MoveResult {
            new_head,
            old_head,
            old_tail: if grow { None } else { Some(old_tail) },
            accepted: true,
        }
    }

    /// Same as `move_step` but for a raw vector. Anything that is not one of the
    /// four unit vectors fails without touching the snake.
    pub fn move_by_vector(&mut self, v: Position, grow: bool) -> Result<MoveResult> {
        let dir = Direction::try_from(v)?;
        Ok(self.move_step(dir, grow))
    }

    pub fn detect_self_collision(&self) -> bool {
        let n = self.body.len();
        (0..n).any(|i| (i + 1..n).any(|j| self.body[i] == self.body[j]))
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}
