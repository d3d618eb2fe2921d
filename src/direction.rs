use std::fmt;

use crate::error::{Result, SokoError};

/// A single player move. The declaration order is the search order used to
/// break ties between equally short walks, so the derived `Ord` must not be
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

impl Direction {
    /// Row and column offsets of one step in this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
        }
    }

    pub fn from_char(ch: char) -> Result<Direction> {
        match ch {
            'u' | 'U' => Ok(Direction::Up),
            'r' | 'R' => Ok(Direction::Right),
            'd' | 'D' => Ok(Direction::Down),
            'l' | 'L' => Ok(Direction::Left),
            _ => Err(SokoError::InvalidMove(ch)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Right => 'r',
            Direction::Down => 'd',
            Direction::Left => 'l',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Right => write!(f, "right"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
        }
    }
}

/// Parse a solution string such as `"rrDDlu"`, failing on the first
/// character that is not a move.
pub fn parse_moves(text: &str) -> Result<Vec<Direction>> {
    text.chars().map(Direction::from_char).collect()
}

pub fn format_moves(moves: &[Direction]) -> String {
    moves.iter().map(|m| m.to_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves_mixed_case() {
        let moves = parse_moves("uRdL").unwrap();
        assert_eq!(
            moves,
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left
            ]
        );
    }

    #[test]
    fn test_parse_moves_invalid_char() {
        assert_eq!(parse_moves("rrx"), Err(SokoError::InvalidMove('x')));
        assert_eq!(parse_moves("r r"), Err(SokoError::InvalidMove(' ')));
    }

    #[test]
    fn test_format_moves_lowercase() {
        let moves = parse_moves("UURDL").unwrap();
        assert_eq!(format_moves(&moves), "uurdl");
        assert_eq!(format_moves(&[]), "");
    }

    #[test]
    fn test_search_order() {
        let mut sorted = vec![
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];
        sorted.sort();
        assert_eq!(sorted, ALL_DIRECTIONS.to_vec());
    }
}
