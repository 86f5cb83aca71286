//! Greedy axis-alignment pursuit.
//!
//! The AI alternates axes by turn parity: on odd turns it closes the X gap,
//! on even turns the Y gap. When the chosen axis is already aligned it does
//! not move that turn, so it can stall for one turn at a time.

use crate::entity::{Direction, Player};

/// Pick the AI's step towards `target`, or `None` when the axis selected by
/// `turn` is already aligned.
pub fn pursue(ai: &Player, target: &Player, turn: u32) -> Option<Direction> {
    if turn % 2 == 1 {
        if ai.x == target.x {
            return None;
        }
        Some(if ai.x < target.x {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        if ai.y == target.y {
            return None;
        }
        Some(if ai.y < target.y {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerId;

    fn at(x: usize, y: usize) -> Player {
        Player::new(PlayerId::Second, 'O', x, y)
    }

    #[test]
    fn test_odd_turn_aligns_x() {
        let human = at(1, 1);
        assert_eq!(pursue(&at(8, 8), &human, 1), Some(Direction::Left));
        assert_eq!(pursue(&at(0, 8), &human, 3), Some(Direction::Right));
    }

    #[test]
    fn test_even_turn_aligns_y() {
        let human = at(1, 1);
        assert_eq!(pursue(&at(8, 8), &human, 2), Some(Direction::Up));
        assert_eq!(pursue(&at(8, 8), &at(1, 9), 0), Some(Direction::Down));
    }

    #[test]
    fn test_aligned_axis_stalls() {
        let human = at(4, 1);
        assert_eq!(pursue(&at(4, 8), &human, 1), None);
        assert_eq!(pursue(&at(4, 8), &human, 2), Some(Direction::Up));
        assert_eq!(pursue(&at(7, 1), &human, 2), None);
    }
}
