//! Terminal snake: steer the snake around a 32x32 board, eat berries to grow,
//! and stay clear of the walls and your own tail.
//!
//! The core (`position`, `snake`, `berry`, `game`) is plain synchronous state
//! with no I/O. `input`, `term` and `app` put it on a terminal.

pub mod app;
pub mod berry;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod position;
pub mod snake;
pub mod term;

pub use berry::Berry;
pub use config::GameConfig;
pub use error::SnakeError;
pub use game::{Command, Event, GameOver, GameState, Session, Status};
pub use position::{Direction, Position};
pub use snake::{MoveResult, Snake};
