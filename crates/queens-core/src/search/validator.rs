use crate::Board;

/// Placement rule consulted by the search kernel for every candidate cell
pub trait Constraint {
    /// Whether `col` on `row` is compatible with the queens on rows `< row`
    fn admits(&self, board: &Board, row: usize, col: usize) -> bool;
}

/// Standard queen attacks: column and both diagonals
#[derive(Debug, Clone, Copy, Default)]
pub struct QueenConstraint;

impl Constraint for QueenConstraint {
    fn admits(&self, board: &Board, row: usize, col: usize) -> bool {
        is_safe(board, row, col)
    }
}

/// Whether a queen at (`row`, `col`) is attacked by any queen on an earlier row.
///
/// Only rows `0..row` are inspected; empty rows never conflict. The caller
/// guarantees `row` and `col` are in range.
pub fn is_safe(board: &Board, row: usize, col: usize) -> bool {
    board.cells()[..row]
        .iter()
        .enumerate()
        .all(|(i, placed)| match *placed {
            Some(other) => other != col && other.abs_diff(col) != row - i,
            None => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board_of(columns: &[usize], size: usize) -> Board {
        let mut board = Board::empty(size);
        for (row, &col) in columns.iter().enumerate() {
            board.place(row, col);
        }
        board
    }

    #[test]
    fn test_first_row_is_always_safe() {
        let board = Board::empty(8);
        assert!((0..8).all(|col| is_safe(&board, 0, col)));
    }

    #[test]
    fn test_column_conflict() {
        let board = board_of(&[3], 8);
        assert!(!is_safe(&board, 1, 3));
        assert!(!is_safe(&board, 5, 3));
    }

    #[test]
    fn test_diagonal_conflicts() {
        let board = board_of(&[3], 8);
        assert!(!is_safe(&board, 1, 2));
        assert!(!is_safe(&board, 1, 4));
        assert!(!is_safe(&board, 3, 0));
        assert!(!is_safe(&board, 4, 7));
        assert!(is_safe(&board, 1, 5));
        assert!(is_safe(&board, 2, 4));
    }

    #[test]
    fn test_later_rows_are_ignored() {
        let mut board = Board::empty(4);
        board.place(3, 0);
        assert!(is_safe(&board, 1, 0));
    }

    proptest! {
        #[test]
        fn prop_safe_iff_no_attack(
            size in 1usize..10,
            seed in proptest::collection::vec(0usize..10, 0..10),
            col in 0usize..10,
        ) {
            let row = seed.len().min(size - 1);
            let col = col % size;
            let columns: Vec<usize> = seed.iter().take(row).map(|c| c % size).collect();
            let board = board_of(&columns, size);

            let attacked = columns.iter().enumerate().any(|(i, &other)| {
                other == col || (other as isize - col as isize).abs() == (i as isize - row as isize).abs()
            });
            prop_assert_eq!(is_safe(&board, row, col), !attacked);
            prop_assert_eq!(QueenConstraint.admits(&board, row, col), !attacked);
        }
    }
}
