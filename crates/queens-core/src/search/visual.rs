use super::{Checkpoint, Constraint, Observer, SearchResult, StepEvent, StepKind};
use crate::Board;
use tracing::trace;

/// Animated backtracking: emits an event for every step, honors pause and
/// the step delay, and unwinds as soon as cancellation is seen.
///
/// Columns are tried in ascending order, rows top-down, so the step
/// sequence and the first solution are reproducible. On `Found` the board
/// holds the solution; on `Exhausted` it is empty again; on `Cancelled` it
/// holds whatever was placed when the run unwound.
pub fn search_visual<K, C, O>(
    board: &mut Board,
    constraint: &K,
    control: &C,
    observer: &mut O,
) -> SearchResult
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    O: Observer + ?Sized,
{
    let mut search = VisualSearch {
        board,
        constraint,
        control,
        observer,
    };
    search.search(0)
}

struct VisualSearch<'a, K: ?Sized, C: ?Sized, O: ?Sized> {
    board: &'a mut Board,
    constraint: &'a K,
    control: &'a C,
    observer: &'a mut O,
}

impl<K, C, O> VisualSearch<'_, K, C, O>
where
    K: Constraint + ?Sized,
    C: Checkpoint + ?Sized,
    O: Observer + ?Sized,
{
    fn search(&mut self, row: usize) -> SearchResult {
        if self.interrupted() {
            return SearchResult::Cancelled;
        }

        let size = self.board.size();
        if row == size {
            self.emit(StepKind::SolutionFound, None);
            return SearchResult::Found;
        }

        self.emit(StepKind::Searching { row }, Some(row));

        for col in 0..size {
            if self.interrupted() {
                return SearchResult::Cancelled;
            }
            if !self.constraint.admits(self.board, row, col) {
                continue;
            }

            self.board.place(row, col);
            self.emit(StepKind::Placed { row, col }, None);

            match self.search(row + 1) {
                SearchResult::Found => return SearchResult::Found,
                SearchResult::Cancelled => return SearchResult::Cancelled,
                SearchResult::Exhausted => {}
            }

            if self.control.cancelled() {
                return SearchResult::Cancelled;
            }
            self.board.clear_row(row);
            self.emit(StepKind::Backtracking { row }, None);
        }

        SearchResult::Exhausted
    }

    /// Cancellation check, then the pause wait
    fn interrupted(&self) -> bool {
        self.control.cancelled() || self.control.hold_if_paused()
    }

    fn emit(&mut self, kind: StepKind, highlight_row: Option<usize>) {
        trace!(?kind, "step");
        let event = StepEvent {
            board: self.board.clone(),
            kind,
            highlight_row,
            status: self.control.status(),
        };
        self.observer.on_step(&event);
        self.control.pace();
    }
}
