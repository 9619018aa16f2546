use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{error, info};

use crate::berry::Berry;
use crate::config::{GameConfig, GRID_DIM};
use crate::error::SnakeError;
use crate::game::{self, Event, GameOver, Session};
use crate::input::{is_ctrl_c, map_key, FrameInput};
use crate::position::Position;
use crate::snake::Snake;
use crate::term::{TermCoords, TermManager};

const SNAKE_BODY: [char; 2] = ['█', '█'];
const BERRY: [char; 2] = ['(', ')'];
const DEAD_SNAKE: [char; 2] = ['X', 'X'];
const EMPTY: [char; 2] = [' ', ' '];

/// Rows above the board, used by the score line.
const BOARD_TOP: u16 = 1;
const MIN_WIDTH: u16 = (GRID_DIM as u16 + 1) * 2;
const MIN_HEIGHT: u16 = GRID_DIM as u16 + 1 + BOARD_TOP;

/// Shortest wait for input; keeps the loop responsive between frames.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Sets up the terminal, plays one game and always puts the terminal back.
pub fn run(config: GameConfig) -> Result<()> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut term = TermManager::new().context("reading terminal size")?;
    let (width, height) = term.size();
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(SnakeError::TerminalTooSmall {
            width,
            height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        }
        .into());
    }

    term.setup().context("entering raw mode")?;
    let mut app = App::new(term, config, rng);
    let played = app.play();
    let restored = app.term.restore();
    finish(played, restored)
}

/// A failed game wins over a failed restore, which is only logged then.
fn finish(played: Result<()>, restored: io::Result<()>) -> Result<()> {
    match (played, restored) {
        (Err(e), Err(restore_err)) => {
            error!(%restore_err, "could not restore terminal");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored.context("restoring terminal"),
    }
}

struct App<R: Rng> {
    term: TermManager,
    session: Session<R>,
    config: GameConfig,
    paused: bool,
}

impl<R: Rng> App<R> {
    fn new(term: TermManager, config: GameConfig, rng: R) -> Self {
        let session = Session::new(&config, rng);
        App { term, session, config, paused: false }
    }

    fn play(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        self.term.clear()?;
        self.draw_walls()?;
        self.draw_board()?;
        self.term.flush()?;

        loop {
            let input = self.collect_input()?;

            if input.pause_toggled() {
                self.toggle_pause()?;
            }
            if self.paused && input.command() != game::Command::Quit {
                continue;
            }

            let events = self.session.frame(input.command());
            self.draw_update(&events)?;
            self.term.flush()?;

            if let Some(Event::Ended(reason)) = events.last() {
                return self.game_over(*reason);
            }
        }
    }

    /// Waits out one frame, gathering keys as they arrive.
    fn collect_input(&mut self) -> Result<FrameInput> {
        let interval = self.config.frame_interval(self.session.state().len())?;
        let deadline = Instant::now() + interval;
        let mut input = FrameInput::new();

        loop {
            for ev in self.term.read_key_events(POLL_INTERVAL)? {
                input.push(map_key(&ev));
            }
            if Instant::now() >= deadline {
                return Ok(input);
            }
        }
    }

    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(!is_ctrl_c(&key))
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if self.paused {
            self.term.hide_message()?;
        } else {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Q to quit"])?;
        }

        self.paused = !self.paused;
        Ok(())
    }

    fn game_over(&mut self, reason: GameOver) -> Result<()> {
        let length = self.session.state().len();
        info!(?reason, length, "session finished");

        if reason == GameOver::Quit {
            return Ok(());
        }

        let body: Vec<Position> = self.session.state().snake().body().to_vec();
        for pos in body {
            self.draw_cell(pos, DEAD_SNAKE)?;
        }

        let why = match reason {
            GameOver::Wall => "You hit the wall!",
            _ => "You ran into yourself!",
        };
        self.term.show_message(&[
            "Game over!",
            why,
            &format!("Score: {}", length),
            "",
            "Press any key to quit",
        ])?;

        self.term.read_key_blocking()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_walls(&mut self) -> Result<()> {
        for i in 0..=GRID_DIM {
            let end = i == 0 || i == GRID_DIM;
            let horizontal = if end { ['+', '+'] } else { ['-', '-'] };
            self.draw_cell(Position::new(i, 0), horizontal)?;
            self.draw_cell(Position::new(i, GRID_DIM), horizontal)?;
            if !end {
                self.draw_cell(Position::new(0, i), [' ', '|'])?;
                self.draw_cell(Position::new(GRID_DIM, i), ['|', ' '])?;
            }
        }
        Ok(())
    }

    fn draw_board(&mut self) -> Result<()> {
        let snake = self.session.state().snake().clone();
        let berry = self.session.berry().clone();

        for y in 1..GRID_DIM {
            for x in 1..GRID_DIM {
                let pos = Position::new(x, y);
                self.draw_cell(pos, cell_at(pos, &snake, &berry))?;
            }
        }

        self.draw_score()
    }

    /// Touches only the cells a frame's events changed.
    fn draw_update(&mut self, events: &[Event]) -> Result<()> {
        let updates = frame_updates(events, self.session.state().snake(), self.session.berry());
        for (pos, chars) in updates {
            self.draw_cell(pos, chars)?;
        }

        self.draw_score()
    }

    fn draw_score(&mut self) -> Result<()> {
        let length = self.session.state().len();
        let score = format!("SCORE: {} | SPEED: {:.2}", length, game::speed(length));
        self.term.print_str_at((0, 0), &format!("{:<width$}", score, width = MIN_WIDTH as usize))?;
        Ok(())
    }

    fn draw_cell(&mut self, pos: Position, chars: [char; 2]) -> Result<()> {
        if let Some((col, row)) = to_term(pos) {
            self.term.print_at((col, row), chars[0])?;
            self.term.print_at((col + 1, row), chars[1])?;
        }
        Ok(())
    }
}

/// What a board cell shows for the given snake and berry.
fn cell_at(pos: Position, snake: &Snake, berry: &Berry) -> [char; 2] {
    if pos == snake.head() {
        let head = snake.head_char();
        [head, head]
    } else if snake.body().contains(&pos) {
        SNAKE_BODY
    } else if !berry.is_consumed() && pos == berry.location() {
        BERRY
    } else {
        EMPTY
    }
}

/// Cells to redraw after a frame, given the snake and berry as they are after it.
fn frame_updates(events: &[Event], snake: &Snake, berry: &Berry) -> Vec<(Position, [char; 2])> {
    let mut cells = vec![];

    for event in events {
        match *event {
            Event::BerrySpawned(pos) if !snake.body().contains(&pos) => cells.push((pos, BERRY)),
            Event::Moved(res) if res.accepted => {
                if snake.len() > 1 {
                    cells.push((res.old_head, SNAKE_BODY));
                }
                // A berry hidden under the tail shows up once the tail leaves
                if let Some(tail) = res.old_tail {
                    let under = if !berry.is_consumed() && berry.location() == tail { BERRY } else { EMPTY };
                    cells.push((tail, under));
                }
                let head = snake.head_char();
                cells.push((res.new_head, [head, head]));
            }
            _ => {}
        }
    }

    cells
}

/// Each grid cell is two columns wide so the board looks square.
fn to_term(pos: Position) -> Option<TermCoords> {
    if !(0..=GRID_DIM).contains(&pos.x) || !(0..=GRID_DIM).contains(&pos.y) {
        return None;
    }
    Some((pos.x as u16 * 2, pos.y as u16 + BOARD_TOP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use anyhow::anyhow;

    use crate::game::{Command, GameState};
    use crate::position::Direction;

    fn full_board(snake: &Snake, berry: &Berry) -> HashMap<Position, [char; 2]> {
        let mut board = HashMap::new();
        for y in 1..GRID_DIM {
            for x in 1..GRID_DIM {
                let pos = Position::new(x, y);
                board.insert(pos, cell_at(pos, snake, berry));
            }
        }
        board
    }

    #[test]
    fn updates_track_full_redraw() {
        for seed in 0..20 {
            let config = GameConfig { respawn_chance: 0.3, ..GameConfig::with_seed(seed) };
            let mut rng = StdRng::seed_from_u64(seed + 1000);
            let mut session = Session::new(&config, StdRng::seed_from_u64(seed));
            let mut board = full_board(session.state().snake(), session.berry());

            for _ in 0..300 {
                let dir = Direction::ALL[rng.gen_range(0..4)];
                let events = session.frame(Command::Turn(dir));
                if !session.state().is_active() {
                    break;
                }

                for (pos, chars) in frame_updates(&events, session.state().snake(), session.berry()) {
                    board.insert(pos, chars);
                }
                assert_eq!(
                    board,
                    full_board(session.state().snake(), session.berry()),
                    "seed {} diverged",
                    seed
                );
            }
        }
    }

    #[test]
    fn tail_uncovers_hidden_berry() {
        let snake = Snake::from_body(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        )
        .unwrap();
        let mut state = GameState::new(snake);
        let res = state.tick(Command::Continue, false).unwrap();
        let berry = Berry::at(Position::new(3, 5));

        let cells = frame_updates(&[Event::Moved(res)], state.snake(), &berry);
        assert!(cells.contains(&(Position::new(3, 5), BERRY)));
        assert_eq!(cells.last(), Some(&(Position::new(6, 5), ['>', '>'])));
    }

    #[test]
    fn rejected_move_redraws_nothing() {
        let mut state = GameState::new(Snake::new());
        let res = state.tick(Command::Turn(Direction::Left), false).unwrap();
        let berry = Berry::at(Position::new(2, 2));

        assert!(frame_updates(&[Event::Moved(res)], state.snake(), &berry).is_empty());
    }

    #[test]
    fn game_error_survives_failed_restore() {
        let restore_failed = io::Error::new(io::ErrorKind::Other, "tty gone");
        let res = finish(Err(anyhow!("bad frame")), Err(restore_failed));
        assert_eq!(res.unwrap_err().to_string(), "bad frame");

        let res = finish(Ok(()), Err(io::Error::new(io::ErrorKind::Other, "tty gone")));
        assert_eq!(res.unwrap_err().to_string(), "restoring terminal");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn board_fits_minimum_terminal() {
        assert_eq!(to_term(Position::new(0, 0)), Some((0, BOARD_TOP)));
        let (col, row) = to_term(Position::new(GRID_DIM, GRID_DIM)).unwrap();
        assert!(col + 1 < MIN_WIDTH);
        assert!(row < MIN_HEIGHT);
    }

    #[test]
    fn off_board_cells_are_skipped() {
        assert_eq!(to_term(Position::new(-1, 3)), None);
        assert_eq!(to_term(Position::new(3, GRID_DIM + 1)), None);
    }
}
