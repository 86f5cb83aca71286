//! The movement engine: validates and applies one directional step.
//!
//! A step goes through four stages:
//! 1. Block check: a 1x1 player cannot step onto a registered obstacle and
//!    loses [`BLOCKED_MOVE_PENALTY`] points trying.
//! 2. Boundary check: the leading edge must stay inside the playable area.
//!    Grown players keep one extra cell of clearance on the bottom and right,
//!    the sides they grow towards.
//! 3. Edge update: the trailing edge is vacated and the leading edge stamped.
//! 4. Bonus collection over the whole new footprint, then a full restamp.
//!
//! Only accepted steps are recorded in the player's history.

use tracing::debug;

use crate::constants::{BLOCKED_MOVE_PENALTY, GROW_BONUS_SCORE, SCORE_BONUS_SCORE, SPAWN_BONUS_SCORE};
use crate::entity::{BonusKind, Direction, ObstacleRegistry, Player};
use crate::error::Result;
use crate::grid::{Cell, Grid, Rect};

/// What a call to [`move_player`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The step was applied. `collected` lists every bonus picked up, in scan
    /// order. A [`BonusKind::Spawn`] entry asks the caller to generate the
    /// extra obstacles, since that needs both footprints and the round's RNG.
    Moved { collected: Vec<BonusKind> },
    /// A 1x1 player walked into an obstacle; the penalty was applied.
    Blocked,
    /// The step would leave the playable area. Nothing changed.
    AtBorder,
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

fn step(value: usize, delta: isize) -> Option<usize> {
    value.checked_add_signed(delta)
}

/// Put back whatever a player leaves behind: the obstacle if one is
/// registered there, empty otherwise.
fn vacate(grid: &mut Grid, registry: &ObstacleRegistry, y: usize, x: usize) -> Result<()> {
    let cell = if registry.contains(x, y) {
        Cell::Obstacle
    } else {
        Cell::Empty
    };
    grid.set(y, x, cell)
}

/// Whether the leading edge of `next` stays within the playable area.
fn within_bounds(grid: &Grid, player: &Player, next: &Rect, direction: Direction) -> bool {
    let playable = grid.playable();
    let clearance = usize::from(player.passes_obstacles());
    match direction {
        Direction::Up => next.y >= playable.y,
        Direction::Left => next.x >= playable.x,
        Direction::Down => next.bottom() + clearance <= playable.bottom(),
        Direction::Right => next.right() + clearance <= playable.right(),
    }
}

/// Grow by one in both axes, shifting the anchor back so the grown
/// footprint keeps the bottom and right clearance of [`within_bounds`].
/// Growth is refused when that does not fit, so the size never shrinks.
fn grow(grid: &Grid, player: &mut Player) -> bool {
    let playable = grid.playable();
    let (width, height) = (player.width + 1, player.height + 1);
    if width >= playable.width || height >= playable.height {
        return false;
    }
    player.width = width;
    player.height = height;
    player.x = player.x.min(playable.right() - width - 1);
    player.y = player.y.min(playable.bottom() - height - 1);
    true
}

/// Move `player` one cell in `direction`, mutating the player and the grid.
///
/// Rejected moves leave grid, position and history untouched; only the
/// blocked-by-obstacle case changes the score.
pub fn move_player(
    grid: &mut Grid,
    registry: &ObstacleRegistry,
    player: &mut Player,
    direction: Direction,
) -> Result<MoveOutcome> {
    let (dx, dy) = direction.delta();

    if player.is_unit() {
        if let (Some(tx), Some(ty)) = (step(player.x, dx), step(player.y, dy)) {
            if registry.contains(tx, ty) {
                player.score -= BLOCKED_MOVE_PENALTY;
                debug!(
                    player = %player.id,
                    %direction,
                    x = tx,
                    y = ty,
                    score = player.score,
                    "move blocked by obstacle"
                );
                return Ok(MoveOutcome::Blocked);
            }
        }
    }

    let old = player.footprint();
    let next = match (step(old.x, dx), step(old.y, dy)) {
        (Some(x), Some(y)) => Rect::new(x, y, old.width, old.height),
        _ => return Ok(MoveOutcome::AtBorder),
    };
    if !within_bounds(grid, player, &next, direction) {
        debug!(player = %player.id, %direction, "move stopped at the border");
        return Ok(MoveOutcome::AtBorder);
    }

    // Bonuses are read before the leading edge overwrites them.
    let mut collected = Vec::new();
    for (y, x) in next.cells() {
        if let Cell::Bonus(kind) = grid.get(y, x)? {
            collected.push(kind);
        }
    }

    for (y, x) in old.cells().filter(|&(y, x)| !next.contains(x, y)) {
        vacate(grid, registry, y, x)?;
    }
    for (y, x) in next.cells().filter(|&(y, x)| !old.contains(x, y)) {
        grid.set(y, x, player.cell())?;
    }
    player.x = next.x;
    player.y = next.y;

    if !collected.is_empty() {
        for &kind in &collected {
            match kind {
                BonusKind::Grow => {
                    if !grow(grid, player) {
                        debug!(player = %player.id, "no room to grow");
                    }
                    player.score += GROW_BONUS_SCORE;
                }
                BonusKind::Score => player.score += SCORE_BONUS_SCORE,
                BonusKind::Spawn => player.score += SPAWN_BONUS_SCORE,
            }
            debug!(player = %player.id, ?kind, score = player.score, "bonus collected");
        }
        for (y, x) in next.cells() {
            vacate(grid, registry, y, x)?;
        }
        grid.stamp_footprint(player.footprint(), player.cell())?;
    }

    player.history.push(direction);
    Ok(MoveOutcome::Moved { collected })
}
