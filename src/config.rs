use std::time::Duration;

use crate::error::{Result, SnakeError};
use crate::game::speed;
use crate::position::{Direction, Position};

/// Cells per side. Columns and rows 0 and `GRID_DIM` are walls.
pub const GRID_DIM: i32 = 32;

/// Inclusive range berries spawn in, keeping them off the cells next to the walls.
pub const BERRY_MIN: i32 = 2;
pub const BERRY_MAX: i32 = 30;

pub const RESPAWN_CHANCE: f64 = 0.06;

pub const START_HEAD: Position = Position::new(16, 16);
pub const START_LENGTH: i32 = 3;
pub const START_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Probability per frame that an eaten berry comes back.
    pub respawn_chance: f64,
    /// Multiplier applied to the frame interval.
    pub speed_scale: f64,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            respawn_chance: RESPAWN_CHANCE,
            speed_scale: 1.0,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        GameConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Time between frames for a snake of `len` segments.
    pub fn frame_interval(&self, len: usize) -> Result<Duration> {
        let seconds = speed(len) * self.speed_scale;
        Duration::try_from_secs_f64(seconds).map_err(|_| SnakeError::InvalidFrameInterval(seconds))
    }
}

pub fn validate_speed_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(SnakeError::InvalidSpeedScale(scale))
    }
}

/// `--speed-scale` parser for clap.
pub fn parse_speed_scale(s: &str) -> std::result::Result<f64, String> {
    let scale: f64 = s.parse().map_err(|e| format!("{}", e))?;
    validate_speed_scale(scale).map_err(|e| e.to_string())
}
