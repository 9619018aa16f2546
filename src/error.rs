use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnakeError {
    #[error("({x},{y}) is not a unit direction")]
    InvalidDirection { x: i32, y: i32 },

    #[error("a snake needs at least one segment")]
    EmptyBody,

    #[error("speed scale must be a finite number above zero, got {0}")]
    InvalidSpeedScale(f64),

    #[error("{0} seconds is not a usable frame interval")]
    InvalidFrameInterval(f64),

    #[error("terminal is {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

pub type Result<T> = std::result::Result<T, SnakeError>;
