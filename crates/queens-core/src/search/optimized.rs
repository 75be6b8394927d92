use super::{Checkpoint, Constraint, SearchResult};
use crate::Board;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::ControlFlow;

/// Order in which a row's columns are tried
trait ColumnOrder {
    fn columns(&mut self, size: usize) -> Vec<usize>;
}

struct Ascending;

impl ColumnOrder for Ascending {
    fn columns(&mut self, size: usize) -> Vec<usize> {
        (0..size).collect()
    }
}

struct Shuffled<'r, R: ?Sized>(&'r mut R);

impl<R: Rng + ?Sized> ColumnOrder for Shuffled<'_, R> {
    fn columns(&mut self, size: usize) -> Vec<usize> {
        let mut columns: Vec<usize> = (0..size).collect();
        columns.shuffle(&mut *self.0);
        columns
    }
}

/// Fastest route to the first solution: no events, no pause, no delay.
///
/// Same recursion and ascending column order as the visual kernel, so both
/// reach the same first solution. Cancellation is still checked on every
/// row and column.
pub fn search_optimized<K, C>(board: &mut Board, constraint: &K, control: &C) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
{
    descend(board, 0, constraint, control, &mut Ascending)
}

/// Like [`search_optimized`] but with the columns of each row shuffled, so
/// repeated calls wander to different solutions.
pub fn search_shuffled<K, C, R>(
    board: &mut Board,
    constraint: &K,
    control: &C,
    rng: &mut R,
) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    R: Rng + ?Sized,
{
    descend(board, 0, constraint, control, &mut Shuffled(rng))
}

/// Exhaustive depth-first enumeration in ascending column order.
///
/// `on_solution` sees every complete board in traversal order and may stop
/// the walk with `ControlFlow::Break`, in which case `Found` is returned and
/// the board still holds that solution. A full walk returns `Exhausted`.
pub fn enumerate<K, C, F>(
    board: &mut Board,
    constraint: &K,
    control: &C,
    mut on_solution: F,
) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    F: FnMut(&Board) -> ControlFlow<()>,
{
    walk(board, 0, constraint, control, &mut on_solution)
}

fn descend<K, C, O>(
    board: &mut Board,
    row: usize,
    constraint: &K,
    control: &C,
    order: &mut O,
) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    O: ColumnOrder,
{
    if control.cancelled() {
        return SearchResult::Cancelled;
    }
    let size = board.size();
    if row == size {
        return SearchResult::Found;
    }

    for col in order.columns(size) {
        if control.cancelled() {
            return SearchResult::Cancelled;
        }
        if constraint.admits(board, row, col) {
            board.place(row, col);
            match descend(board, row + 1, constraint, control, order) {
                SearchResult::Exhausted => board.clear_row(row),
                done => return done,
            }
        }
    }
    SearchResult::Exhausted
}

fn walk<K, C, F>(
    board: &mut Board,
    row: usize,
    constraint: &K,
    control: &C,
    on_solution: &mut F,
) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    F: FnMut(&Board) -> ControlFlow<()>,
{
    if control.cancelled() {
        return SearchResult::Cancelled;
    }
    let size = board.size();
    if row == size {
        return match on_solution(&*board) {
            ControlFlow::Break(()) => SearchResult::Found,
            ControlFlow::Continue(()) => SearchResult::Exhausted,
        };
    }

    for col in 0..size {
        if control.cancelled() {
            return SearchResult::Cancelled;
        }
        if constraint.admits(board, row, col) {
            board.place(row, col);
            match walk(board, row + 1, constraint, control, on_solution) {
                SearchResult::Exhausted => board.clear_row(row),
                done => return done,
            }
        }
    }
    SearchResult::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::QueenConstraint;
    use crate::{ExecutionState, Solution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn idle() -> ExecutionState {
        ExecutionState::new(Duration::ZERO)
    }

    fn all_solutions(size: usize) -> Vec<Solution> {
        let mut board = Board::empty(size);
        let mut found = Vec::new();
        let result = enumerate(&mut board, &QueenConstraint, &idle(), |b| {
            found.extend(b.to_solution());
            ControlFlow::Continue(())
        });
        assert_eq!(result, SearchResult::Exhausted);
        assert!(board.is_empty());
        found
    }

    #[test]
    fn test_first_solution_eight_queens() {
        let mut board = Board::empty(8);
        let result = search_optimized(&mut board, &QueenConstraint, &idle());
        assert_eq!(result, SearchResult::Found);
        assert_eq!(
            board.to_solution().unwrap().columns(),
            &[0, 4, 7, 5, 2, 6, 1, 3]
        );
    }

    #[test]
    fn test_solution_counts() {
        let expected = [(1, 1), (2, 0), (3, 0), (4, 2), (5, 10), (6, 4), (7, 40), (8, 92)];
        for (size, count) in expected {
            assert_eq!(all_solutions(size).len(), count, "size {}", size);
        }
    }

    #[test]
    fn test_enumeration_order_is_lexicographic() {
        let solutions = all_solutions(6);
        let mut sorted = solutions.clone();
        sorted.sort();
        assert_eq!(solutions, sorted);
        assert_eq!(solutions[0].columns(), &[1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn test_enumerated_solutions_are_distinct_and_valid() {
        let solutions = all_solutions(8);
        let distinct: std::collections::HashSet<_> = solutions.iter().collect();
        assert_eq!(distinct.len(), solutions.len());
        assert!(solutions.iter().all(Solution::is_attack_free));
    }

    #[test]
    fn test_enumeration_can_stop_early() {
        let mut board = Board::empty(8);
        let mut seen = 0;
        let result = enumerate(&mut board, &QueenConstraint, &idle(), |_| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(result, SearchResult::Found);
        assert_eq!(board.to_solution(), Some(all_solutions(8)[2].clone()));
    }

    #[test]
    fn test_shuffled_finds_valid_solutions() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut board = Board::empty(8);
            let result = search_shuffled(&mut board, &QueenConstraint, &idle(), &mut rng);
            assert_eq!(result, SearchResult::Found);
            assert!(board.to_solution().is_some());
        }

        let mut board = Board::empty(3);
        let result = search_shuffled(&mut board, &QueenConstraint, &idle(), &mut rng);
        assert_eq!(result, SearchResult::Exhausted);
    }

    #[test]
    fn test_shuffled_is_reproducible_with_seed() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::empty(10);
            search_shuffled(&mut board, &QueenConstraint, &idle(), &mut rng);
            board
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_cancellation_stops_enumeration() {
        let state = idle();
        let _guard = state.begin().unwrap();
        state.request_cancel();

        let mut board = Board::empty(8);
        let mut count = 0;
        let result = enumerate(&mut board, &QueenConstraint, &state, |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(result, SearchResult::Cancelled);
        assert_eq!(count, 0);

        let result = search_optimized(&mut board, &QueenConstraint, &state);
        assert_eq!(result, SearchResult::Cancelled);
    }

    /// Columns only: every permutation is a placement
    struct Rooks;

    impl Constraint for Rooks {
        fn admits(&self, board: &Board, row: usize, col: usize) -> bool {
            board.cells()[..row].iter().all(|placed| *placed != Some(col))
        }
    }

    #[test]
    fn test_kernel_uses_supplied_constraint() {
        let mut board = Board::empty(4);
        let mut count = 0;
        enumerate(&mut board, &Rooks, &idle(), |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(count, 24);

        let mut board = Board::empty(3);
        assert_eq!(
            search_optimized(&mut board, &Rooks, &idle()),
            SearchResult::Found
        );
        assert_eq!(board.cells(), &[Some(0), Some(1), Some(2)]);
    }
}
