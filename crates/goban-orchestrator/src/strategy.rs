//! Move placement strategies

use goban_core::types::Position;

/// Chooses where the next stone goes
pub trait MoveStrategy: Send {
    fn next_position(&mut self) -> Position;
}

/// Plays successive rows of one fixed column
///
/// Two instances on different columns give a deterministic game: the column
/// that moves first lines up five in a row while the other trails one move
/// behind and never completes.
#[derive(Clone, Copy, Debug)]
pub struct ColumnStrategy {
    column: u32,
    next_row: u32,
}

impl ColumnStrategy {
    pub fn new(column: u32) -> Self {
        Self {
            column,
            next_row: 0,
        }
    }
}

impl MoveStrategy for ColumnStrategy {
    fn next_position(&mut self) -> Position {
        let position = Position {
            x: self.column,
            y: self.next_row,
        };
        self.next_row += 1;
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_strategy_walks_rows() {
        let mut strategy = ColumnStrategy::new(3);
        let positions: Vec<_> = (0..5).map(|_| strategy.next_position()).collect();

        for (row, position) in positions.iter().enumerate() {
            assert_eq!(position.x, 3);
            assert_eq!(position.y, row as u32);
        }
    }
}
