//! The 2D cell grid the round is played on.
//!
//! Coordinates are `(y, x)` for cell access, with `y` the row. Access outside
//! `[0, height) x [0, width)` fails with [`Error::OutOfBounds`]; nothing is
//! ever clamped.

use std::fmt;

use crate::config::Tokens;
use crate::entity::{BonusKind, PlayerId};
use crate::error::{Error, Result};

/// Semantic content of a grid cell. Characters come from [`Tokens`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Obstacle,
    Border,
    Bonus(BonusKind),
    Player(PlayerId),
}

/// An axis-aligned rectangle `[x, x + width) x [y, y + height)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two rectangles share at least one cell. Symmetric.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether `self` lies entirely inside `outer`.
    pub fn fits_within(&self, outer: &Rect) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }

    /// All `(y, x)` cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (y, x)))
    }
}

/// A fixed-size grid of cells with an optional immutable border ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    bordered: bool,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid filled with [`Cell::Empty`], then stamp the outer ring
    /// with [`Cell::Border`] if `with_border` is set.
    pub fn new(height: usize, width: usize, with_border: bool) -> Self {
        let mut grid = Self {
            height,
            width,
            bordered: with_border,
            cells: vec![Cell::Empty; height * width],
        };
        if with_border {
            for y in 0..height {
                for x in 0..width {
                    if grid.on_ring(y, x) {
                        grid.cells[y * width + x] = Cell::Border;
                    }
                }
            }
        }
        grid
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn in_bounds(&self, y: usize, x: usize) -> bool {
        y < self.height && x < self.width
    }

    fn idx(&self, y: usize, x: usize) -> Result<usize> {
        if !self.in_bounds(y, x) {
            return Err(Error::OutOfBounds {
                y,
                x,
                height: self.height,
                width: self.width,
            });
        }
        Ok(y * self.width + x)
    }

    pub fn get(&self, y: usize, x: usize) -> Result<Cell> {
        Ok(self.cells[self.idx(y, x)?])
    }

    pub fn set(&mut self, y: usize, x: usize, cell: Cell) -> Result<()> {
        let i = self.idx(y, x)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Whether `(y, x)` is on the outermost ring, border or not.
    pub fn on_ring(&self, y: usize, x: usize) -> bool {
        y == 0 || x == 0 || y + 1 == self.height || x + 1 == self.width
    }

    /// The area players may occupy: everything inside the border ring, or the
    /// whole grid when there is no border.
    pub fn playable(&self) -> Rect {
        if self.bordered {
            Rect::new(
                1,
                1,
                self.width.saturating_sub(2),
                self.height.saturating_sub(2),
            )
        } else {
            Rect::new(0, 0, self.width, self.height)
        }
    }

    fn check_rect(&self, rect: &Rect) -> Result<()> {
        if rect.width == 0 || rect.height == 0 {
            return Ok(());
        }
        self.idx(rect.bottom() - 1, rect.right() - 1).map(|_| ())
    }

    /// Write `cell` across the whole rectangle. Nothing is written if any
    /// part of it falls outside the grid.
    pub fn stamp_footprint(&mut self, rect: Rect, cell: Cell) -> Result<()> {
        self.check_rect(&rect)?;
        for (y, x) in rect.cells() {
            let i = y * self.width + x;
            self.cells[i] = cell;
        }
        Ok(())
    }

    /// Reset the rectangle to [`Cell::Empty`].
    pub fn clear_footprint(&mut self, rect: Rect) -> Result<()> {
        self.stamp_footprint(rect, Cell::Empty)
    }

    /// Every cell as `(y, x, cell)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i / self.width, i % self.width, c))
    }

    /// Number of cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Plain text rendering, one line per row. This is also the map format.
    pub fn render(&self, tokens: &Tokens) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|&c| tokens.char_of(c)));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Tokens::default()))
    }
}
