//! Flat text map format.
//!
//! One line per grid row, one character per cell, using the configured
//! [`Tokens`]. The first line fixes the width; every other line must match it.
//! Reading the file is up to the caller.

use crate::config::Tokens;
use crate::entity::PlayerId;
use crate::error::MapFormatError;
use crate::grid::{Cell, Grid, Rect};

/// Parse a map. With `bordered` set, border tokens on the outer ring become
/// [`Cell::Border`] and the grid treats that ring as the border; elsewhere
/// the shared `#` character reads as an obstacle.
pub fn parse_map(text: &str, tokens: &Tokens, bordered: bool) -> Result<Grid, MapFormatError> {
    let rows: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(MapFormatError::Empty);
    }
    let height = rows.len();

    let mut grid = Grid::new(height, width, bordered);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(MapFormatError::RaggedRow {
                row: y,
                expected: width,
                found: row.len(),
            });
        }
        for (x, &ch) in row.iter().enumerate() {
            let on_ring = bordered && grid.on_ring(y, x);
            let cell = tokens
                .cell_of(ch, on_ring)
                .ok_or(MapFormatError::UnknownToken { row: y, col: x, ch })?;
            // (y, x) comes from the row/column counts checked above.
            let _ = grid.set(y, x, cell);
        }
    }
    Ok(grid)
}

/// Render a grid in the map format.
pub fn export_map(grid: &Grid, tokens: &Tokens) -> String {
    grid.render(tokens)
}

/// Find a player's footprint on a loaded grid: the bounding box of its
/// cells, which must be completely filled.
pub fn locate_player(grid: &Grid, id: PlayerId) -> Result<Rect, MapFormatError> {
    let cell = Cell::Player(id);
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    let mut count = 0;
    for (y, x, c) in grid.cells() {
        if c != cell {
            continue;
        }
        count += 1;
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds.ok_or(MapFormatError::MissingPlayer(id))?;
    let rect = Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1);
    if rect.width * rect.height != count {
        return Err(MapFormatError::BrokenFootprint(id));
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BonusKind;

    const MAP: &str = "\
######
#X..B#
#.#..#
#..OO#
#..OO#
######
";

    #[test]
    fn test_parse_map() {
        let grid = parse_map(MAP, &Tokens::default(), true).unwrap();
        assert_eq!((grid.height(), grid.width()), (6, 6));
        assert_eq!(grid.get(0, 0), Ok(Cell::Border));
        assert_eq!(grid.get(2, 2), Ok(Cell::Obstacle));
        assert_eq!(grid.get(1, 4), Ok(Cell::Bonus(BonusKind::Grow)));
        assert_eq!(grid.get(1, 1), Ok(Cell::Player(PlayerId::First)));
    }

    #[test]
    fn test_export_roundtrip() {
        let tokens = Tokens::default();
        let grid = parse_map(MAP, &tokens, true).unwrap();
        assert_eq!(export_map(&grid, &tokens), MAP);
    }

    #[test]
    fn test_crlf_lines() {
        let grid = parse_map("###\r\n#.#\r\n###\r\n", &Tokens::default(), true).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(1, 1), Ok(Cell::Empty));
    }

    #[test]
    fn test_unbordered_reads_hash_as_obstacle() {
        let grid = parse_map("#.\n..\n", &Tokens::default(), false).unwrap();
        assert_eq!(grid.get(0, 0), Ok(Cell::Obstacle));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = parse_map("####\n#..\n####\n", &Tokens::default(), true).unwrap_err();
        assert_eq!(
            err,
            MapFormatError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(
            parse_map("", &Tokens::default(), true),
            Err(MapFormatError::Empty)
        );
        assert_eq!(
            parse_map("..\n.?\n", &Tokens::default(), false),
            Err(MapFormatError::UnknownToken {
                row: 1,
                col: 1,
                ch: '?'
            })
        );
    }

    #[test]
    fn test_locate_player() {
        let grid = parse_map(MAP, &Tokens::default(), true).unwrap();
        assert_eq!(
            locate_player(&grid, PlayerId::First),
            Ok(Rect::new(1, 1, 1, 1))
        );
        assert_eq!(
            locate_player(&grid, PlayerId::Second),
            Ok(Rect::new(3, 3, 2, 2))
        );

        let broken = parse_map("....\n.O..\n..O.\n", &Tokens::default(), false).unwrap();
        assert_eq!(
            locate_player(&broken, PlayerId::Second),
            Err(MapFormatError::BrokenFootprint(PlayerId::Second))
        );
        assert_eq!(
            locate_player(&broken, PlayerId::First),
            Err(MapFormatError::MissingPlayer(PlayerId::First))
        );
    }
}
