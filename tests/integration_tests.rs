//! Integration tests for catchme-rust
//!
//! These drive the engine through its public API only: whole rounds, the
//! movement engine on hand-built grids, the map format and the session.

use catchme_rust::ai::pursue;
use catchme_rust::config::{Difficulty, Settings, Tokens};
use catchme_rust::constants::{BLOCKED_MOVE_PENALTY, GROW_BONUS_SCORE};
use catchme_rust::entity::{BonusKind, Direction, Obstacle, ObstacleRegistry, Player, PlayerId};
use catchme_rust::error::{ConfigError, Error};
use catchme_rust::grid::{Cell, Grid};
use catchme_rust::map::{export_map, parse_map};
use catchme_rust::movement::{MoveOutcome, move_player};
use catchme_rust::round::{Mode, Round, RoundState, check_win};
use catchme_rust::session::Session;

// =============================================================================
// Helper functions for setting up test grids
// =============================================================================

/// A bordered grid with the default 10x10 playable area and the given
/// players stamped on it.
fn setup_grid(players: &[&Player]) -> Grid {
    let settings = Settings::default();
    let mut grid = Grid::new(settings.grid_height(), settings.grid_width(), true);
    for p in players {
        grid.stamp_footprint(p.footprint(), p.cell()).unwrap();
    }
    grid
}

fn add_obstacle(grid: &mut Grid, registry: &mut ObstacleRegistry, x: usize, y: usize) {
    grid.set(y, x, Cell::Obstacle).unwrap();
    registry.register(Obstacle { x, y });
}

/// Every cell carrying the player's token lies in its footprint and vice
/// versa.
fn assert_footprint(grid: &Grid, player: &Player) {
    let rect = player.footprint();
    for (y, x, cell) in grid.cells() {
        assert_eq!(
            cell == player.cell(),
            rect.contains(x, y),
            "cell (y={y}, x={x}) disagrees with {} footprint {rect:?}",
            player.id
        );
    }
}

// =============================================================================
// Movement scenarios
// =============================================================================

#[test]
fn test_walk_right_then_down() {
    let mut a = Player::new(PlayerId::First, 'X', 1, 1);
    let b = Player::new(PlayerId::Second, 'O', 8, 8);
    let mut grid = setup_grid(&[&a, &b]);
    let registry = ObstacleRegistry::new();

    let path = [Direction::Right; 5].into_iter().chain([Direction::Down; 6]);
    for direction in path {
        let outcome = move_player(&mut grid, &registry, &mut a, direction).unwrap();
        assert!(outcome.is_applied());
        assert!(!check_win(&a, &b));
        assert_footprint(&grid, &a);
    }
    assert_eq!((a.x, a.y), (6, 7));
    assert_eq!(
        a.history_string(),
        "RIGHT RIGHT RIGHT RIGHT RIGHT DOWN DOWN DOWN DOWN DOWN DOWN"
    );
    assert_footprint(&grid, &b);
}

#[test]
fn test_grow_bonus_then_pass_through_obstacle() {
    let mut a = Player::new(PlayerId::First, 'X', 2, 2);
    let mut grid = setup_grid(&[&a]);
    let mut registry = ObstacleRegistry::new();
    grid.set(2, 3, Cell::Bonus(BonusKind::Grow)).unwrap();
    add_obstacle(&mut grid, &mut registry, 5, 2);

    let outcome = move_player(&mut grid, &registry, &mut a, Direction::Right).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::Moved {
            collected: vec![BonusKind::Grow]
        }
    );
    assert_eq!((a.width, a.height), (2, 2));
    assert_eq!(a.score, GROW_BONUS_SCORE);
    assert_footprint(&grid, &a);

    // The obstacle that would block a 1x1 player is now walked through.
    let outcome = move_player(&mut grid, &registry, &mut a, Direction::Right).unwrap();
    assert!(outcome.is_applied());
    assert_eq!(a.score, GROW_BONUS_SCORE);
    assert!(a.footprint().contains(5, 2));
    assert_footprint(&grid, &a);

    // Once the player has moved past, the obstacle is back.
    for _ in 0..2 {
        move_player(&mut grid, &registry, &mut a, Direction::Right).unwrap();
    }
    assert!(!a.footprint().contains(5, 2));
    assert_eq!(grid.get(2, 5), Ok(Cell::Obstacle));
}

#[test]
fn test_blocked_move_changes_only_the_score() {
    let mut a = Player::new(PlayerId::First, 'X', 5, 5);
    let mut grid = setup_grid(&[&a]);
    let mut registry = ObstacleRegistry::new();
    add_obstacle(&mut grid, &mut registry, 6, 5);
    let before = grid.clone();

    for n in 1..=3 {
        let outcome = move_player(&mut grid, &registry, &mut a, Direction::Right).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(a.score, -BLOCKED_MOVE_PENALTY * n);
    }
    assert_eq!((a.x, a.y), (5, 5));
    assert!(a.history.is_empty());
    assert_eq!(grid, before);
}

#[test]
fn test_out_of_bounds_access_is_an_error() {
    let grid = Grid::new(12, 12, true);
    assert!(matches!(grid.get(12, 0), Err(Error::OutOfBounds { .. })));
    assert!(matches!(grid.get(0, 40), Err(Error::OutOfBounds { .. })));
}

// =============================================================================
// Win detection and AI
// =============================================================================

#[test]
fn test_check_win_is_symmetric() {
    let positions = [(1, 1), (2, 1), (4, 4), (5, 5), (8, 8)];
    for &(ax, ay) in &positions {
        for &(bx, by) in &positions {
            for size in 1..=3 {
                let mut a = Player::new(PlayerId::First, 'X', ax, ay);
                a.width = size;
                a.height = size;
                let b = Player::new(PlayerId::Second, 'O', bx, by);
                assert_eq!(check_win(&a, &b), check_win(&b, &a));
            }
        }
    }
}

#[test]
fn test_ai_odd_turn_moves_towards_smaller_x() {
    let human = Player::new(PlayerId::First, 'X', 1, 1);
    let ai = Player::new(PlayerId::Second, 'O', 8, 8);
    assert_eq!(pursue(&ai, &human, 1), Some(Direction::Left));
}

#[test]
fn test_solo_round_ai_answers_each_move() {
    let map = "\
############
#X.........#
#..........#
#..........#
#..........#
#..........#
#..........#
#..........#
#.......O..#
#..........#
#..........#
############
";
    let mut round = Round::from_map(Settings::default(), Mode::Solo, 20, map).unwrap();
    round.submit_move(Direction::Down).unwrap();
    round.play_ai_turn().unwrap();
    let ai = round.player(PlayerId::Second);
    assert_eq!((ai.x, ai.y), (7, 8));
    assert_eq!(ai.history, vec![Direction::Left]);
}

// =============================================================================
// Whole rounds
// =============================================================================

/// Play random moves on generated rounds and check the grid after every
/// half-turn.
#[test]
fn test_random_rounds_keep_grid_consistent() {
    for seed in 0..20 {
        let mut settings = Settings::default();
        settings.seed = Some(seed);
        settings.difficulty = if seed % 2 == 0 {
            Difficulty::Easy
        } else {
            Difficulty::Hard
        };
        let mut round = Round::new(settings, Mode::Versus, 30).unwrap();
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut sizes = [(1, 1); 2];

        while round.state() == RoundState::InProgress {
            let direction = Direction::ALL[rng.usize(0..Direction::ALL.len())];
            round.submit_move(direction).unwrap();
            if round.state().is_over() {
                break;
            }
            for p in round.players() {
                assert_footprint(round.grid(), p);
                let (w, h) = sizes[p.id.index()];
                assert!(p.width >= w && p.height >= h, "seed {seed}: player shrank");
                sizes[p.id.index()] = (p.width, p.height);
            }
            for o in round.registry().iter() {
                let covered = round.players().iter().any(|p| p.footprint().contains(o.x, o.y));
                if !covered {
                    assert_eq!(round.grid().get(o.y, o.x), Ok(Cell::Obstacle));
                }
            }
        }
        assert!(round.half_turn() <= round.max_half_turns());
    }
}

#[test]
fn test_generated_map_roundtrip() {
    let tokens = Tokens::default();
    for seed in 0..10 {
        let mut settings = Settings::default();
        settings.seed = Some(seed);
        let round = Round::new(settings.clone(), Mode::Versus, 10).unwrap();
        let text = export_map(round.grid(), &tokens);

        let grid = parse_map(&text, &tokens, true).unwrap();
        assert_eq!(&grid, round.grid());
        assert_eq!(export_map(&grid, &tokens), text);

        let loaded = Round::from_map(settings, Mode::Versus, 10, &text).unwrap();
        assert_eq!(loaded.players(), round.players());
        assert_eq!(loaded.registry().len(), round.registry().len());
    }
}

#[test]
fn test_custom_tokens_render_and_load() {
    let mut settings = Settings::default();
    settings.set_by_name("token_empty", " ").unwrap_err();
    settings.set_by_name("token_empty", "_").unwrap();
    settings.set_by_name("token_first", "A").unwrap();
    settings.seed = Some(3);

    let round = Round::new(settings.clone(), Mode::Versus, 10).unwrap();
    let text = export_map(round.grid(), &settings.tokens);
    assert!(text.contains('A'));
    assert!(text.contains('_'));
    assert!(!text.contains('X'));
    assert!(Round::from_map(settings, Mode::Versus, 10, &text).is_ok());
}

#[test]
fn test_conflicting_keys_rejected() {
    let mut settings = Settings::default();
    let before = settings.clone();
    let err = settings.set_by_name("key_up", "D").unwrap_err();
    assert!(matches!(err, ConfigError::Conflict { .. }));
    assert_eq!(settings, before);
}

#[test]
fn test_grid_size_follows_settings() {
    let mut settings = Settings::default();
    settings.set_by_name("width", "15").unwrap();
    settings.set_by_name("height", "7").unwrap();
    settings.seed = Some(1);
    let round = Round::new(settings.clone(), Mode::Versus, 5).unwrap();
    assert_eq!((round.grid().height(), round.grid().width()), (9, 17));

    settings.set_by_name("border", "false").unwrap();
    let round = Round::new(settings, Mode::Versus, 5).unwrap();
    assert_eq!((round.grid().height(), round.grid().width()), (7, 15));
    assert_eq!(round.grid().get(0, 0).map(|c| c == Cell::Border), Ok(false));
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn test_session_plays_a_scripted_game() {
    let map = "\
#######
#X....#
#.....#
#..O..#
#######
";
    let mut session = Session::from_map(Settings::default(), Mode::Versus, 10, map).unwrap();
    // The second player keeps bumping into the bottom border.
    let script = "d\ns\ns\ns\ns\ns\nd\nhistory\nquit\n";
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    // First: (1,1) -> (2,1) -> (2,2) -> (2,3) -> (3,3), onto the second player.
    assert_eq!(
        session.round().state(),
        RoundState::Won(PlayerId::First)
    );
    assert!(text.contains("first wins"));
    assert!(text.contains("first (X): RIGHT DOWN DOWN RIGHT"));
    assert!(session.is_finished());
}
