//! End-to-end checks of the movement, growth and collision rules.

use berry_snake::position::{DOWN, LEFT, RIGHT, UP};
use berry_snake::{
    Berry, Command, Direction, Event, GameOver, GameState, Position, Session, Snake, Status,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn random_direction(rng: &mut StdRng) -> Direction {
    Direction::ALL[rng.gen_range(0..4)]
}

#[test]
fn test_length_changes_only_when_growing() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut snake = Snake::new();

    for _ in 0..200 {
        let before = snake.len();
        let grow = rng.gen_bool(0.2);
        let res = snake.move_step(random_direction(&mut rng), grow);
        assert_eq!(snake.len(), before + (grow && res.accepted) as usize);
    }
}

#[test]
fn test_head_is_sum_of_applied_directions() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut snake = Snake::new();
    let mut expected = snake.head();
    let mut heading = snake.direction();

    for _ in 0..300 {
        let dir = random_direction(&mut rng);
        if !heading.is_opposite(dir) {
            heading = dir;
            expected += dir.vector();
        }

        let res = snake.move_step(dir, false);
        assert_eq!(res.accepted, heading == dir);
        assert_eq!(snake.head(), expected);
    }
}

#[test]
fn test_reverse_is_ignored() {
    let mut snake = Snake::new();
    snake.move_step(Direction::Right, false);
    let res = snake.move_step(Direction::Left, false);

    assert!(!res.accepted);
    assert_eq!(snake.direction(), Direction::Right);
    assert_eq!(snake.head(), pos(17, 16));
    assert_eq!(snake.body(), &[pos(17, 16), pos(16, 16), pos(15, 16)]);
}

#[test]
fn test_reverse_with_growth_keeps_length() {
    let mut state = GameState::new(Snake::new());
    let res = state.tick(Command::Turn(Direction::Left), true).unwrap();

    assert!(!res.accepted);
    assert_eq!(state.len(), 3);
    assert_eq!(state.snake().head(), pos(16, 16));
}

#[test]
fn test_unit_vector_constants() {
    assert_eq!(UP, pos(0, -1));
    assert_eq!(DOWN, pos(0, 1));
    assert_eq!(LEFT, pos(-1, 0));
    assert_eq!(RIGHT, pos(1, 0));
}

#[test]
fn test_collision_iff_duplicate() {
    assert!(!Snake::new().detect_self_collision());

    let dup = Snake::from_body(vec![pos(3, 3), pos(3, 3)], Direction::Up).unwrap();
    assert!(dup.detect_self_collision());

    let apart = Snake::from_body(vec![pos(3, 3), pos(3, 4)], Direction::Up).unwrap();
    assert!(!apart.detect_self_collision());
}

#[test]
fn test_scenario_plain_move() {
    let mut state = GameState::new(Snake::new());
    state.tick(Command::Turn(Direction::Right), false);

    assert_eq!(state.snake().body(), &[pos(17, 16), pos(16, 16), pos(15, 16)]);
    assert!(state.is_active());
}

#[test]
fn test_scenario_growing_move() {
    let mut state = GameState::new(Snake::new());
    state.tick(Command::Turn(Direction::Right), true);

    assert_eq!(
        state.snake().body(),
        &[pos(17, 16), pos(16, 16), pos(15, 16), pos(14, 16)]
    );
}

#[test]
fn test_scenario_wall_hit() {
    let snake = Snake::from_body(vec![pos(1, 16), pos(2, 16), pos(3, 16)], Direction::Left).unwrap();
    let mut state = GameState::new(snake);
    state.tick(Command::Turn(Direction::Left), false);

    assert_eq!(state.snake().head(), pos(0, 16));
    assert_eq!(state.status(), Status::Over(GameOver::Wall));
    assert!(!state.is_active());
}

#[test]
fn test_scenario_berry_flags() {
    let mut berry = Berry::at(pos(5, 5));
    assert!(berry.check_consumption(pos(5, 5)));
    assert!(berry.is_consumed());
    assert!(berry.can_respawn());
    assert!(berry.has_growth_pulse());

    assert!(berry.take_growth_pulse());
    assert!(!berry.has_growth_pulse());
    assert!(berry.can_respawn());

    berry.spawn(&mut StdRng::seed_from_u64(2));
    assert!(!berry.can_respawn());
}

#[test]
fn test_running_straight_hits_right_wall() {
    let mut session = Session::from_parts(
        GameState::new(Snake::new()),
        Berry::at(pos(2, 2)),
        StdRng::seed_from_u64(0),
        0.06,
    );

    let mut frames = 0;
    let mut last = vec![];
    while session.state().is_active() {
        last = session.frame(Command::Continue);
        frames += 1;
    }

    // From x=16 to x=32
    assert_eq!(frames, 16);
    assert_eq!(last.last(), Some(&Event::Ended(GameOver::Wall)));
    assert_eq!(session.state().len(), 3);
}

#[test]
fn test_long_game_grows_once_per_berry() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut session = Session::new(&Default::default(), StdRng::seed_from_u64(78));
    let mut eaten = 0;
    let mut grown = 0;

    // Wander the interior without ever turning into a wall or reversing
    for _ in 0..2000 {
        if !session.state().is_active() {
            break;
        }
        let head = session.state().snake().head();
        let heading = session.state().snake().direction();
        let options: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|d| !heading.is_opposite(*d))
            .filter(|d| berry_snake::game::in_bounds(head + d.vector()))
            .collect();
        let dir = options[rng.gen_range(0..options.len())];

        for event in session.frame(Command::Turn(dir)) {
            match event {
                Event::BerryEaten(_) => eaten += 1,
                Event::Grew => grown += 1,
                _ => {}
            }
        }
    }

    assert_eq!(eaten, grown);
    assert_eq!(session.state().len(), 3 + grown);
}
