//! Default values and tuning parameters for the chase engine.
//!
//! Everything here is a *default*: the engine reads the live values from
//! [`Settings`](crate::config::Settings), which starts out populated from
//! these constants.

// =============================================================================
// Grid Geometry
// =============================================================================

/// Default playable width (the border ring is added around it).
pub const DEFAULT_WIDTH: usize = 10;

/// Default playable height.
pub const DEFAULT_HEIGHT: usize = 10;

/// Smallest accepted playable side.
pub const MIN_SIDE: usize = 3;

/// Largest accepted playable side.
pub const MAX_SIDE: usize = 80;

/// Default number of full turns (each is two half-turns).
pub const DEFAULT_TURNS: u32 = 20;

// =============================================================================
// Tokens
// =============================================================================

pub const TOKEN_EMPTY: char = '.';
pub const TOKEN_OBSTACLE: char = '#';
pub const TOKEN_BORDER: char = '#';
pub const TOKEN_FIRST: char = 'X';
pub const TOKEN_SECOND: char = 'O';
pub const TOKEN_BONUS_GROW: char = 'B';
pub const TOKEN_BONUS_SCORE: char = '$';
pub const TOKEN_BONUS_SPAWN: char = '!';

// =============================================================================
// Key Bindings (ZQSD layout)
// =============================================================================

pub const KEY_UP: char = 'z';
pub const KEY_LEFT: char = 'q';
pub const KEY_DOWN: char = 's';
pub const KEY_RIGHT: char = 'd';
pub const KEY_QUIT: char = 'x';
pub const KEY_RESTART: char = 'r';

// =============================================================================
// Scoring
// =============================================================================

/// Score lost when a 1x1 player walks into an obstacle.
pub const BLOCKED_MOVE_PENALTY: i32 = 8;

/// Score for picking up a grow bonus.
pub const GROW_BONUS_SCORE: i32 = 25;

/// Score for picking up a score bonus.
pub const SCORE_BONUS_SCORE: i32 = 15;

/// Score for picking up a spawn bonus.
pub const SPAWN_BONUS_SCORE: i32 = 10;

// =============================================================================
// Placement
// =============================================================================

/// Obstacle clusters seeded at round start on easy.
pub const EASY_CLUSTERS: usize = 3;

/// Obstacle clusters seeded at round start on hard.
pub const HARD_CLUSTERS: usize = 6;

/// Longest random walk of a cluster on easy.
pub const EASY_MAX_WALK: usize = 3;

/// Longest random walk of a cluster on hard.
pub const HARD_MAX_WALK: usize = 5;

/// Bonuses seeded at round start on easy.
pub const EASY_BONUSES: usize = 4;

/// Bonuses seeded at round start on hard.
pub const HARD_BONUSES: usize = 2;

/// Clusters generated when a spawn bonus is collected.
pub const SPAWN_CLUSTERS: usize = 2;

/// Walk length of each cluster generated by a spawn bonus.
pub const SPAWN_WALK: usize = 3;

/// Anchor re-rolls before a cluster is given up.
pub const MAX_ANCHOR_TRIES: usize = 16;

/// Cells kept free of bonuses along every edge of the grid.
pub const BONUS_EDGE_MARGIN: usize = 2;
