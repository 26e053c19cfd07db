//! Board coordinates and their text labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rules::MoveError;

/// Row and column labels, one character per line of the largest board.
pub const LABELS: &[u8; 19] = b"0123456789ABCDEFGHI";

/// A stone placement.
///
/// Ordered row-major, which makes the final tie-break between equally good
/// moves pick the top-left one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GomokuMove {
    pub row: u8,
    pub col: u8,
}

impl GomokuMove {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Two-character label such as `3A`.
    #[must_use]
    pub fn label(self) -> String {
        let mut s = String::with_capacity(2);
        s.push(label_char(self.row));
        s.push(label_char(self.col));
        s
    }
}

/// Label character for a row or column index.
pub(crate) fn label_char(index: u8) -> char {
    LABELS.get(index as usize).map_or('?', |&b| b as char)
}

/// Index of a label character, case-insensitive.
fn label_index(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase() as u32;
    LABELS
        .iter()
        .position(|&b| b as u32 == upper)
        .map(|i| i as u8)
}

impl FromStr for GomokuMove {
    type Err = MoveError;

    /// Parse a row label followed by a column label, e.g. `4c`.
    ///
    /// Only the label syntax is checked here; whether the square exists on a
    /// given board is up to [`GameState::do_move`](crate::rules::GameState::do_move).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(c), None) => match (label_index(r), label_index(c)) {
                (Some(row), Some(col)) => Ok(Self::new(row, col)),
                _ => Err(MoveError::InvalidMove(format!("unknown label in {s:?}"))),
            },
            _ => Err(MoveError::InvalidMove(format!(
                "expected two label characters, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for GomokuMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("00".parse::<GomokuMove>().unwrap(), GomokuMove::new(0, 0));
        assert_eq!("4C".parse::<GomokuMove>().unwrap(), GomokuMove::new(4, 12));
        assert_eq!("ia".parse::<GomokuMove>().unwrap(), GomokuMove::new(18, 10));
        assert_eq!(" 27 ".parse::<GomokuMove>().unwrap(), GomokuMove::new(2, 7));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<GomokuMove>().is_err());
        assert!("1".parse::<GomokuMove>().is_err());
        assert!("123".parse::<GomokuMove>().is_err());
        assert!("1J".parse::<GomokuMove>().is_err());
        assert!("-1".parse::<GomokuMove>().is_err());
    }

    #[test]
    fn test_label_round_trip() {
        let mv = GomokuMove::new(11, 3);
        assert_eq!(mv.label(), "B3");
        assert_eq!(mv.label().parse::<GomokuMove>().unwrap(), mv);
    }

    #[test]
    fn test_display() {
        assert_eq!(GomokuMove::new(2, 7).to_string(), "[2, 7]");
    }

    #[test]
    fn test_row_major_order() {
        assert!(GomokuMove::new(0, 8) < GomokuMove::new(1, 0));
        assert!(GomokuMove::new(3, 2) < GomokuMove::new(3, 4));
    }
}
