use rand::Rng;
use tracing::{debug, info};

use crate::berry::Berry;
use crate::config::{GameConfig, GRID_DIM};
use crate::position::{Direction, Position};
use crate::snake::{MoveResult, Snake};

/// One resolved input for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// No key pressed, keep the current heading.
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOver {
    Wall,
    SelfCollision,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Over(GameOver),
}

/// Whether `pos` lies in the playable interior, [1, GRID_DIM - 1] on both axes.
pub fn in_bounds(pos: Position) -> bool {
    (1..GRID_DIM).contains(&pos.x) && (1..GRID_DIM).contains(&pos.y)
}

/// Seconds between frames. The snake speeds up as it gets longer.
pub fn speed(len: usize) -> f64 {
    1.0 / len.max(1) as f64
}

/// Owns the snake and the only authority to steer it. Once over, stays over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    snake: Snake,
    status: Status,
}

impl GameState {
    pub fn new(snake: Snake) -> Self {
        GameState { snake, status: Status::Active }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    /// Applies one move and checks for the wall, then for the body. Returns
    /// `None` when play is over or on quit. A rejected reversal comes back with
    /// `accepted == false` and leaves the snake as it was.
    pub fn tick(&mut self, command: Command, grow: bool) -> Option<MoveResult> {
        if !self.is_active() {
            return None;
        }

        let dir = match command {
            Command::Turn(dir) => dir,
            Command::Continue => self.snake.direction(),
            Command::Quit => {
                self.end(GameOver::Quit);
                return None;
            }
        };

        let res = self.snake.move_step(dir, grow);

        if res.accepted {
            if !in_bounds(res.new_head) {
                self.end(GameOver::Wall);
            } else if self.snake.detect_self_collision() {
                self.end(GameOver::SelfCollision);
            }
        }

        Some(res)
    }

    fn end(&mut self, reason: GameOver) {
        info!(?reason, length = self.snake.len(), head = %self.snake.head(), "game over");
        self.status = Status::Over(reason);
    }
}

/// Everything that happened during one frame, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    BerryEaten(Position),
    BerrySpawned(Position),
    Moved(MoveResult),
    Grew,
    Ended(GameOver),
}

/// A game in progress: the state, its berry and the randomness driving respawns.
pub struct Session<R: Rng> {
    state: GameState,
    berry: Berry,
    rng: R,
    respawn_chance: f64,
}

impl<R: Rng> Session<R> {
    pub fn new(config: &GameConfig, mut rng: R) -> Self {
        let berry = Berry::new(&mut rng);
        Session::from_parts(GameState::new(Snake::new()), berry, rng, config.respawn_chance)
    }

    pub fn from_parts(state: GameState, berry: Berry, rng: R, respawn_chance: f64) -> Self {
        Session { state, berry, rng, respawn_chance }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn berry(&self) -> &Berry {
        &self.berry
    }

    /// Respawns the berry if `draw` beats the respawn chance and the berry has
    /// been eaten. Returns the new location.
    pub fn try_spawn_berry(&mut self, draw: f64) -> Option<Position> {
        if draw >= self.respawn_chance || !self.berry.can_respawn() {
            return None;
        }

        self.berry.spawn(&mut self.rng);
        Some(self.berry.location())
    }

    /// Runs one frame: eat, read the growth pulse, maybe respawn, then move.
    pub fn frame(&mut self, command: Command) -> Vec<Event> {
        let mut events = vec![];

        if !self.state.is_active() {
            return events;
        }

        let head = self.state.snake().head();
        if self.berry.check_consumption(head) {
            events.push(Event::BerryEaten(head));
        }

        let grow = self.berry.take_growth_pulse();

        let draw: f64 = self.rng.gen();
        if let Some(location) = self.try_spawn_berry(draw) {
            events.push(Event::BerrySpawned(location));
        }

        if let Some(res) = self.state.tick(command, grow) {
            events.push(Event::Moved(res));
            // A reversal swallows the pulse without growing
            if grow && res.accepted {
                debug!(length = self.state.len(), "snake grew");
                events.push(Event::Grew);
            }
        }

        if let Status::Over(reason) = self.state.status() {
            events.push(Event::Ended(reason));
        }

        events
    }
}
