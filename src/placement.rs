//! Obstacle and bonus generation.
//!
//! Obstacles grow as short random walks from an anchor picked near the grid
//! center; bonuses land near the far corner. Nothing is ever written over a
//! player footprint, and a region too small to pick from simply places
//! nothing.

use std::ops::Range;

use fastrand::Rng;
use tracing::debug;

use crate::config::Difficulty;
use crate::constants::{BONUS_EDGE_MARGIN, MAX_ANCHOR_TRIES, SPAWN_CLUSTERS, SPAWN_WALK};
use crate::entity::{Bonus, BonusKind, Obstacle, ObstacleRegistry};
use crate::grid::{Cell, Grid, Rect};

/// Rows and columns a random cell is drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    fn pick(&self, rng: &mut Rng) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        Some((rng.usize(self.rows.clone()), rng.usize(self.cols.clone())))
    }
}

fn intersect(range: Range<usize>, lo: usize, hi: usize) -> Range<usize> {
    range.start.max(lo)..range.end.min(hi)
}

/// Where obstacle anchors are drawn from: the central half of the grid on
/// easy, everything but a two-cell margin on hard. Always inside the
/// playable area.
pub fn obstacle_region(grid: &Grid, difficulty: Difficulty) -> Region {
    let (h, w) = (grid.height(), grid.width());
    let (rows, cols) = match difficulty {
        Difficulty::Easy => (h / 4..(3 * h).div_ceil(4), w / 4..(3 * w).div_ceil(4)),
        Difficulty::Hard => (2..h.saturating_sub(2), 2..w.saturating_sub(2)),
    };
    let playable = grid.playable();
    Region {
        rows: intersect(rows, playable.y, playable.bottom()),
        cols: intersect(cols, playable.x, playable.right()),
    }
}

/// Where bonuses are drawn from: the bottom-right quarter, away from the
/// top-left start. Cells in the two outer rings are dropped afterwards.
pub fn bonus_region(grid: &Grid) -> Region {
    Region {
        rows: grid.height() / 2..grid.height(),
        cols: grid.width() / 2..grid.width(),
    }
}

/// Random walk length for a seeded cluster.
pub fn random_walk_length(difficulty: Difficulty, rng: &mut Rng) -> usize {
    rng.usize(1..=difficulty.max_walk())
}

fn covered(avoid: &[Rect], x: usize, y: usize) -> bool {
    avoid.iter().any(|r| r.contains(x, y))
}

/// Grow one obstacle cluster of `steps` cells.
///
/// The anchor is re-rolled while it falls on a footprint in `avoid`. Each step
/// extends the walk by one along Y or X with equal probability and places an
/// obstacle on the new cell if it is empty and playable. Returns the number of
/// obstacles placed.
pub fn place_obstacle_cluster(
    grid: &mut Grid,
    registry: &mut ObstacleRegistry,
    avoid: &[Rect],
    difficulty: Difficulty,
    steps: usize,
    rng: &mut Rng,
) -> usize {
    let region = obstacle_region(grid, difficulty);
    let mut anchor = None;
    for _ in 0..MAX_ANCHOR_TRIES {
        match region.pick(rng) {
            Some((y, x)) if !covered(avoid, x, y) => {
                anchor = Some((y, x));
                break;
            }
            Some(_) => continue,
            None => break,
        }
    }
    let Some((mut y, mut x)) = anchor else {
        debug!(?region, "no anchor for obstacle cluster, skipping");
        return 0;
    };

    let playable = grid.playable();
    let mut placed = 0;
    for _ in 0..steps {
        if rng.bool() {
            y += 1;
        } else {
            x += 1;
        }
        if !playable.contains(x, y) {
            break;
        }
        if covered(avoid, x, y) || grid.get(y, x) != Ok(Cell::Empty) {
            continue;
        }
        if grid.set(y, x, Cell::Obstacle).is_ok() && registry.register(Obstacle { x, y }) {
            placed += 1;
        }
    }
    placed
}

/// Seed the round's obstacle clusters. Returns the number of obstacles placed.
pub fn seed_obstacles(
    grid: &mut Grid,
    registry: &mut ObstacleRegistry,
    avoid: &[Rect],
    difficulty: Difficulty,
    rng: &mut Rng,
) -> usize {
    (0..difficulty.cluster_count())
        .map(|_| {
            let steps = random_walk_length(difficulty, rng);
            place_obstacle_cluster(grid, registry, avoid, difficulty, steps, rng)
        })
        .sum()
}

/// Obstacles generated by a collected spawn bonus: a fixed number of clusters
/// with a fixed walk length.
pub fn spawn_extra_obstacles(
    grid: &mut Grid,
    registry: &mut ObstacleRegistry,
    avoid: &[Rect],
    difficulty: Difficulty,
    rng: &mut Rng,
) -> usize {
    (0..SPAWN_CLUSTERS)
        .map(|_| place_obstacle_cluster(grid, registry, avoid, difficulty, SPAWN_WALK, rng))
        .sum()
}

/// Try to drop one bonus of a random kind.
///
/// Returns `None` when the drawn cell is within the two outer rings, is not
/// empty, or the region is degenerate.
pub fn place_bonus(grid: &mut Grid, rng: &mut Rng) -> Option<Bonus> {
    let (y, x) = bonus_region(grid).pick(rng)?;
    let kind = BonusKind::ALL[rng.usize(0..BonusKind::ALL.len())];

    let inside = |v: usize, size: usize| {
        v >= BONUS_EDGE_MARGIN && v < size.saturating_sub(BONUS_EDGE_MARGIN)
    };
    if !inside(y, grid.height()) || !inside(x, grid.width()) {
        debug!(x, y, "bonus drawn too close to the edge, dropped");
        return None;
    }
    if grid.get(y, x) != Ok(Cell::Empty) {
        return None;
    }
    grid.set(y, x, Cell::Bonus(kind)).ok()?;
    Some(Bonus::new(x, y, kind))
}

/// Seed the round's bonuses. Dropped placements are not retried.
pub fn seed_bonuses(grid: &mut Grid, difficulty: Difficulty, rng: &mut Rng) -> Vec<Bonus> {
    (0..difficulty.bonus_count())
        .filter_map(|_| place_bonus(grid, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(grid: &Grid) -> Vec<Rect> {
        let p = grid.playable();
        vec![
            Rect::new(p.x, p.y, 1, 1),
            Rect::new(p.right() - 1, p.bottom() - 1, 1, 1),
        ]
    }

    #[test]
    fn test_obstacle_region_inside_playable() {
        let grid = Grid::new(12, 12, true);
        let easy = obstacle_region(&grid, Difficulty::Easy);
        assert_eq!(easy.rows, 3..9);
        assert_eq!(easy.cols, 3..9);
        let hard = obstacle_region(&grid, Difficulty::Hard);
        assert_eq!(hard.rows, 2..10);
        assert!(hard.cols.len() > easy.cols.len());
    }

    #[test]
    fn test_obstacles_match_registry_and_avoid_players() {
        for seed in 0..50 {
            let mut rng = Rng::with_seed(seed);
            let mut grid = Grid::new(12, 12, true);
            let mut registry = ObstacleRegistry::new();
            let avoid = starts(&grid);
            let placed =
                seed_obstacles(&mut grid, &mut registry, &avoid, Difficulty::Hard, &mut rng);

            assert_eq!(placed, registry.len());
            assert_eq!(grid.count(Cell::Obstacle), registry.len());
            for o in registry.iter() {
                assert!(!covered(&avoid, o.x, o.y), "seed {seed}: obstacle on a player");
                assert!(!grid.on_ring(o.y, o.x), "seed {seed}: obstacle on the border");
            }
        }
    }

    #[test]
    fn test_cluster_walk_length_bounds() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..100 {
            let easy = random_walk_length(Difficulty::Easy, &mut rng);
            assert!((1..=3).contains(&easy));
            let hard = random_walk_length(Difficulty::Hard, &mut rng);
            assert!((1..=5).contains(&hard));
        }
    }

    #[test]
    fn test_anchor_rerolls_away_from_players() {
        // Only one anchor cell is available and a player stands on it.
        let mut grid = Grid::new(3, 3, true);
        let mut registry = ObstacleRegistry::new();
        let avoid = [Rect::new(1, 1, 1, 1)];
        let mut rng = Rng::with_seed(3);
        let placed = place_obstacle_cluster(
            &mut grid,
            &mut registry,
            &avoid,
            Difficulty::Easy,
            3,
            &mut rng,
        );
        assert_eq!(placed, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_degenerate_grid_places_nothing() {
        let mut rng = Rng::with_seed(11);
        let mut grid = Grid::new(2, 2, true);
        let before = grid.clone();
        let mut registry = ObstacleRegistry::new();
        assert_eq!(
            seed_obstacles(&mut grid, &mut registry, &[], Difficulty::Hard, &mut rng),
            0
        );
        assert!(seed_bonuses(&mut grid, Difficulty::Easy, &mut rng).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_bonuses_stay_off_outer_rings() {
        for seed in 0..50 {
            let mut rng = Rng::with_seed(seed);
            let mut grid = Grid::new(12, 12, true);
            for bonus in seed_bonuses(&mut grid, Difficulty::Easy, &mut rng) {
                assert!((2..10).contains(&bonus.x) && (2..10).contains(&bonus.y));
                assert!(bonus.x >= 6 && bonus.y >= 6, "bonus biased to the far corner");
                assert_eq!(grid.get(bonus.y, bonus.x), Ok(Cell::Bonus(bonus.kind)));
            }
        }
    }

    #[test]
    fn test_spawn_extra_obstacles_adds_to_registry() {
        let mut rng = Rng::with_seed(5);
        let mut grid = Grid::new(22, 22, true);
        let mut registry = ObstacleRegistry::new();
        let before = registry.len();
        let placed =
            spawn_extra_obstacles(&mut grid, &mut registry, &[], Difficulty::Easy, &mut rng);
        assert_eq!(registry.len(), before + placed);
        assert!(placed <= SPAWN_CLUSTERS * SPAWN_WALK);
    }
}
