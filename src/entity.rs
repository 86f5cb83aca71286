//! Players, obstacles, bonuses and the obstacle registry.

use std::collections::HashSet;
use std::fmt;

use crate::grid::{Cell, Grid, Rect};

/// One of the four movement directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Offset as `(dx, dy)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    /// Uppercase name used in the move history.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Left => "LEFT",
            Direction::Down => "DOWN",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the two combatants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    First,
    Second,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::First => 0,
            PlayerId::Second => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }

    /// The player who moves on the given half-turn: first on even, second on odd.
    pub fn for_half_turn(half_turn: u32) -> Self {
        if half_turn % 2 == 0 {
            PlayerId::First
        } else {
            PlayerId::Second
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::First => f.write_str("first"),
            PlayerId::Second => f.write_str("second"),
        }
    }
}

/// A combatant on the grid.
///
/// The footprint is the `width` x `height` rectangle anchored at `(x, y)`.
/// Size only grows (grow bonus) and a grown player walks through obstacles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub token: char,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub score: i32,
    /// Accepted moves in play order.
    pub history: Vec<Direction>,
}

impl Player {
    /// A 1x1 player at `(x, y)` with an empty score and history.
    pub fn new(id: PlayerId, token: char, x: usize, y: usize) -> Self {
        Self {
            id,
            token,
            x,
            y,
            width: 1,
            height: 1,
            score: 0,
            history: Vec::new(),
        }
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether the player still has its starting 1x1 size.
    pub fn is_unit(&self) -> bool {
        self.width == 1 && self.height == 1
    }

    /// Grown players pass through obstacles.
    pub fn passes_obstacles(&self) -> bool {
        !self.is_unit()
    }

    /// The grid cell this player stamps.
    pub fn cell(&self) -> Cell {
        Cell::Player(self.id)
    }

    /// Space separated move history, e.g. `RIGHT RIGHT DOWN`.
    pub fn history_string(&self) -> String {
        self.history
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An immovable single-cell obstacle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Obstacle {
    pub x: usize,
    pub y: usize,
}

/// What happens when a bonus is collected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BonusKind {
    /// Grow by one in both axes and gain obstacle pass-through.
    Grow,
    /// Score only.
    Score,
    /// Score plus a burst of new obstacle clusters.
    Spawn,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Grow, BonusKind::Score, BonusKind::Spawn];
}

/// A single-cell bonus marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bonus {
    pub x: usize,
    pub y: usize,
    pub kind: BonusKind,
}

impl Bonus {
    pub fn new(x: usize, y: usize, kind: BonusKind) -> Self {
        Self { x, y, kind }
    }
}

/// Every obstacle placed during a round, consulted for collision checks.
///
/// Owned by the round; obstacles are only ever added.
#[derive(Clone, Debug, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    cells: HashSet<(usize, usize)>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from every obstacle cell of a loaded grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut registry = Self::new();
        for (y, x, cell) in grid.cells() {
            if cell == Cell::Obstacle {
                registry.register(Obstacle { x, y });
            }
        }
        registry
    }

    /// Record an obstacle. Returns `false` if the cell was already registered.
    pub fn register(&mut self, obstacle: Obstacle) -> bool {
        if !self.cells.insert((obstacle.x, obstacle.y)) {
            return false;
        }
        self.obstacles.push(obstacle);
        true
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter()
    }
}
