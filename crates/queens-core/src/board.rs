use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Largest supported board; every column maps to a file letter `a..z`
pub const MAX_BOARD_SIZE: usize = 26;

/// Classic eight queens
pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Row-indexed queen placements. `None` marks a row with no queen yet.
///
/// The length always equals the board size. Only the search kernels place
/// and lift queens, so every row index they write is in range; outside the
/// crate a board is read-only.
///
/// ```compile_fail
/// let mut board = queens_core::Board::new(4).unwrap();
/// board.place(9, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Option<usize>>,
}

impl Board {
    /// Create an empty board, rejecting unsupported sizes
    pub fn new(size: usize) -> ControlResult<Self> {
        check_size(size)?;
        Ok(Self::empty(size))
    }

    pub(crate) fn empty(size: usize) -> Self {
        Self {
            cells: vec![None; size],
        }
    }

    /// Board showing a complete solution
    pub fn from_solution(solution: &Solution) -> Self {
        Self {
            cells: solution.columns().iter().map(|&col| Some(col)).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Column of the queen on `row`, if any
    pub fn get(&self, row: usize) -> Option<usize> {
        self.cells.get(row).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    pub(crate) fn place(&mut self, row: usize, col: usize) {
        self.cells[row] = Some(col);
    }

    pub(crate) fn clear_row(&mut self, row: usize) {
        self.cells[row] = None;
    }

    /// Remove every queen
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Number of queens on the board
    pub fn placed(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Snapshot as a solution, if every row holds a queen and none attack
    pub fn to_solution(&self) -> Option<Solution> {
        let columns = self.cells.iter().copied().collect::<Option<Vec<_>>>()?;
        Solution::from_columns(columns)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.size();
        for (row, cell) in self.cells.iter().enumerate() {
            write!(f, "{:>2} ", size - row)?;
            for col in 0..size {
                let mark = if *cell == Some(col) { 'Q' } else { '.' };
                write!(f, " {}", mark)?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..size {
            write!(f, " {}", file_letter(col))?;
        }
        Ok(())
    }
}

/// A complete, attack-free placement. Identity is the column tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Solution(Vec<usize>);

impl Solution {
    /// Build a solution from one column per row. Returns `None` for empty,
    /// oversized, out-of-range or conflicting placements.
    pub fn from_columns(columns: Vec<usize>) -> Option<Self> {
        let size = columns.len();
        if size == 0 || size > MAX_BOARD_SIZE || columns.iter().any(|&col| col >= size) {
            return None;
        }
        let solution = Self(columns);
        solution.is_attack_free().then_some(solution)
    }

    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Pairwise check: distinct columns and no shared diagonal
    pub fn is_attack_free(&self) -> bool {
        let cols = &self.0;
        (0..cols.len()).all(|i| {
            (i + 1..cols.len()).all(|j| cols[i] != cols[j] && cols[i].abs_diff(cols[j]) != j - i)
        })
    }

    /// Algebraic square names in row order, e.g. `["a8", "e7", ...]`
    pub fn squares(&self) -> Vec<String> {
        let size = self.size();
        self.0
            .iter()
            .enumerate()
            .map(|(row, &col)| square_name(row, col, size))
            .collect()
    }

    /// Comma-separated chess notation, e.g. `a8, e7, h6, f5, c4, g3, b2, d1`
    pub fn notation(&self) -> String {
        self.squares().join(", ")
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}

impl TryFrom<Vec<usize>> for Solution {
    type Error = String;

    fn try_from(columns: Vec<usize>) -> Result<Self, Self::Error> {
        Solution::from_columns(columns.clone())
            .ok_or_else(|| format!("{:?} is not a valid queens placement", columns))
    }
}

impl From<Solution> for Vec<usize> {
    fn from(solution: Solution) -> Self {
        solution.0
    }
}

/// File letter for a column: 0 -> 'a'
pub fn file_letter(col: usize) -> char {
    debug_assert!(col < MAX_BOARD_SIZE);
    (b'a' + col as u8) as char
}

/// Chess square for a board cell; row 0 is the top rank (`size`)
pub fn square_name(row: usize, col: usize, size: usize) -> String {
    format!("{}{}", file_letter(col), size - row)
}

pub(crate) fn check_size(size: usize) -> ControlResult<()> {
    if (1..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ControlError::InvalidSize { size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_limits() {
        assert!(Board::new(1).is_ok());
        assert!(Board::new(MAX_BOARD_SIZE).is_ok());
        assert_eq!(Board::new(0), Err(ControlError::InvalidSize { size: 0 }));
        assert_eq!(
            Board::new(MAX_BOARD_SIZE + 1),
            Err(ControlError::InvalidSize { size: 27 })
        );
    }

    #[test]
    fn test_place_and_clear() {
        let mut board = Board::new(4).unwrap();
        assert!(board.is_empty());

        board.place(0, 1);
        board.place(1, 3);
        assert_eq!(board.get(0), Some(1));
        assert_eq!(board.get(2), None);
        assert_eq!(board.placed(), 2);
        assert!(!board.is_complete());

        board.clear_row(0);
        assert_eq!(board.get(0), None);

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.size(), 4);
    }

    #[test]
    fn test_to_solution_requires_complete_board() {
        let mut board = Board::new(4).unwrap();
        board.place(0, 1);
        board.place(1, 3);
        board.place(2, 0);
        assert!(board.to_solution().is_none());

        board.place(3, 2);
        let solution = board.to_solution().unwrap();
        assert_eq!(solution.columns(), &[1, 3, 0, 2]);
        assert_eq!(Board::from_solution(&solution), board);
    }

    #[test]
    fn test_solution_rejects_conflicts() {
        // same column
        assert!(Solution::from_columns(vec![0, 0]).is_none());
        // diagonal
        assert!(Solution::from_columns(vec![0, 2, 1]).is_none());
        // out of range
        assert!(Solution::from_columns(vec![1, 3, 0, 4]).is_none());
        assert!(Solution::from_columns(vec![]).is_none());
        assert!(Solution::from_columns(vec![0]).is_some());
    }

    #[test]
    fn test_eight_queens_notation() {
        let solution = Solution::from_columns(vec![0, 4, 7, 5, 2, 6, 1, 3]).unwrap();
        assert_eq!(solution.squares()[0], "a8");
        assert_eq!(solution.notation(), "a8, e7, h6, f5, c4, g3, b2, d1");
        assert_eq!(solution.to_string(), solution.notation());
    }

    #[test]
    fn test_square_name_uses_rank_from_bottom() {
        assert_eq!(square_name(0, 0, 8), "a8");
        assert_eq!(square_name(7, 7, 8), "h1");
        assert_eq!(square_name(3, 2, 4), "c1");
        assert_eq!(file_letter(25), 'z');
    }

    #[test]
    fn test_board_display() {
        let solution = Solution::from_columns(vec![1, 3, 0, 2]).unwrap();
        let text = Board::from_solution(&solution).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " 4  . Q . .");
        assert_eq!(lines[4], "    a b c d");
    }

    #[test]
    fn test_solution_serde() {
        let solution = Solution::from_columns(vec![1, 3, 0, 2]).unwrap();
        let json = serde_json::to_string(&solution).unwrap();
        assert_eq!(json, "[1,3,0,2]");

        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, solution);

        assert!(serde_json::from_str::<Solution>("[0,1]").is_err());
    }
}
