use rand::Rng;
use tracing::debug;

use crate::config::{BERRY_MAX, BERRY_MIN};
use crate::position::Position;

/// The one berry on the board. It is moved on respawn, never replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Berry {
    location: Position,
    consumed: bool,
    can_respawn: bool,
    growth_pulse: bool,
}

impl Berry {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Berry::at(random_location(rng))
    }

    /// A fresh, visible berry at a fixed spot.
    pub fn at(location: Position) -> Self {
        Berry {
            location,
            consumed: false,
            can_respawn: false,
            growth_pulse: false,
        }
    }

    pub fn location(&self) -> Position {
        self.location
    }

    /// Eaten and not yet respawned, so not drawn.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn can_respawn(&self) -> bool {
        self.can_respawn
    }

    /// Pending growth, without clearing it.
    pub fn has_growth_pulse(&self) -> bool {
        self.growth_pulse
    }

    /// Picks a new location and resets every flag. The snake's body is not
    /// avoided; a berry under the snake shows up once the tail moves off it.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Berry::at(random_location(rng));
        debug!(location = %self.location, "berry spawned");
    }

    /// Returns true if this call ate the berry.
    pub fn check_consumption(&mut self, head: Position) -> bool {
        if self.consumed || head != self.location {
            return false;
        }

        self.consumed = true;
        self.growth_pulse = true;
        self.can_respawn = true;
        debug!(location = %self.location, "berry eaten");
        true
    }

    /// Reads the growth pulse and clears it. Only the first call after a
    /// consumption sees `true`.
    pub fn take_growth_pulse(&mut self) -> bool {
        std::mem::take(&mut self.growth_pulse)
    }
}

fn random_location<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(
        rng.gen_range(BERRY_MIN..=BERRY_MAX),
        rng.gen_range(BERRY_MIN..=BERRY_MAX),
    )
}
