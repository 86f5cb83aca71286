//! Catchme-Rust: a turn-based grid chase game engine.
//!
//! Two combatants take alternating half-turns on a bounded grid scattered
//! with obstacles and bonuses. A round is won by moving onto the other
//! player. The second player can be a human or a greedy pursuit AI.
//!
//! ## Modules
//!
//! - [`constants`] - Default dimensions, tokens, keys and score values
//! - [`error`] - Engine error types
//! - [`config`] - Runtime settings and option validation
//! - [`grid`] - The cell matrix and footprint rectangles
//! - [`entity`] - Players, obstacles, bonuses and directions
//! - [`placement`] - Random obstacle and bonus generation
//! - [`movement`] - Validation and application of a single move
//! - [`ai`] - Axis-alignment pursuit
//! - [`round`] - Turn alternation and win detection
//! - [`map`] - Flat text map format
//! - [`session`] - Line-oriented command front end
//!
//! ## Example
//!
//! ```
//! use catchme_rust::config::Settings;
//! use catchme_rust::entity::{Direction, PlayerId};
//! use catchme_rust::round::{Mode, Round, RoundState};
//!
//! let mut settings = Settings::default();
//! settings.seed = Some(7);
//!
//! // Start a round against the AI
//! let mut round = Round::new(settings, Mode::Solo, 20).unwrap();
//!
//! // Move the first player, then let the AI answer
//! round.submit_move(Direction::Right).unwrap();
//! round.play_ai_turn().unwrap();
//! assert_eq!(round.active_player(), PlayerId::First);
//! assert_eq!(round.state(), RoundState::InProgress);
//! println!("{}", round.grid());
//! ```

pub mod ai;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod grid;
pub mod map;
pub mod movement;
pub mod placement;
pub mod round;
pub mod session;
