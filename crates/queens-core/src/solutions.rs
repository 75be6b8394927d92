use crate::Solution;
use std::collections::HashSet;

/// Discovered solutions in discovery order, plus a cursor for browsing.
///
/// A column tuple is stored at most once.
#[derive(Debug, Clone, Default)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
    seen: HashSet<Solution>,
    cursor: usize,
}

impl SolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a single solution
    pub fn record_first(&mut self, solution: Solution) {
        self.clear();
        self.push_distinct(solution);
    }

    /// Append unless already present. On success the cursor moves to the new
    /// entry and its index is returned.
    pub fn push_distinct(&mut self, solution: Solution) -> Option<usize> {
        if !self.seen.insert(solution.clone()) {
            return None;
        }
        self.solutions.push(solution);
        self.cursor = self.solutions.len() - 1;
        Some(self.cursor)
    }

    /// Replace the contents with an enumeration, dropping repeats, and
    /// rewind the cursor
    pub fn replace_all(&mut self, solutions: impl IntoIterator<Item = Solution>) {
        self.clear();
        for solution in solutions {
            self.push_distinct(solution);
        }
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.solutions.clear();
        self.seen.clear();
        self.cursor = 0;
    }

    pub fn contains(&self, solution: &Solution) -> bool {
        self.seen.contains(solution)
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.solutions.get(index)
    }

    /// Solution under the cursor
    pub fn current(&self) -> Option<&Solution> {
        self.solutions.get(self.cursor)
    }

    /// 1-based cursor position and total, for "Solution k/n"
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then(|| (self.cursor + 1, self.len()))
    }

    /// Move the cursor forward, wrapping at the end
    pub fn advance(&mut self) -> Option<&Solution> {
        if self.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.len();
        self.current()
    }

    /// Move the cursor back, wrapping at the start
    pub fn retreat(&mut self) -> Option<&Solution> {
        if self.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.len() - 1) % self.len();
        self.current()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.iter()
    }
}
