use crate::board::check_size;
use crate::control::{ControlHandle, ExecutionState, DEFAULT_STEP_DELAY};
use crate::error::ControlResult;
use crate::search::{
    enumerate, search_optimized, search_shuffled, search_visual, Checkpoint, Mode, Observer,
    QueenConstraint, SearchResult, Speed, StepEvent, StepKind,
};
use crate::solutions::SolutionSet;
use crate::{Board, Solution, DEFAULT_BOARD_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Retry budget of the randomized "next solution" search
pub const DEFAULT_NEXT_ATTEMPTS: usize = 100;

/// How `find_next` looks for a solution not yet in the set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStrategy {
    /// Shuffled column order per attempt, up to `attempts` tries. May give
    /// up before every solution has been seen.
    Randomized { attempts: usize },
    /// First unseen solution in enumeration order; never gives up early
    Canonical,
}

impl Default for NextStrategy {
    fn default() -> Self {
        NextStrategy::Randomized {
            attempts: DEFAULT_NEXT_ATTEMPTS,
        }
    }
}

/// Configuration for a controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Board size (1..=26)
    pub size: usize,
    /// Initial step delay of the animated modes
    pub step_delay: Duration,
    pub next_strategy: NextStrategy,
    /// Seed for the randomized search; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            step_delay: DEFAULT_STEP_DELAY,
            next_strategy: NextStrategy::default(),
            seed: None,
        }
    }
}

impl ControllerConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_speed(self, speed: Speed) -> Self {
        self.with_step_delay(speed.delay())
    }

    pub fn with_next_strategy(mut self, strategy: NextStrategy) -> Self {
        self.next_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Terminal status of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved { solution: Solution, elapsed: Duration },
    /// The search space holds no solution
    Exhausted,
    /// Aborted by the user; the board was reset
    Cancelled,
}

/// Result of looking for one more distinct solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Appended { solution: Solution, index: usize },
    /// Nothing new turned up; the set is unchanged
    NoNewSolution,
    Cancelled,
}

/// Result of enumerating every solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationOutcome {
    Complete { count: usize },
    /// Aborted; the set is unchanged
    Cancelled,
}

/// Owns the execution state, the displayed board and the solution set.
///
/// Every method takes `&self`, so one controller can be shared (`Arc`)
/// between the thread driving a run and the actor issuing pause, resume,
/// cancel and speed commands. At most one run, enumeration or reset is
/// active at a time; a second one is rejected, not queued.
pub struct Controller {
    size: usize,
    state: Arc<ExecutionState>,
    board: Mutex<Board>,
    solutions: Mutex<SolutionSet>,
    next_strategy: NextStrategy,
    rng: Mutex<StdRng>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> ControlResult<Self> {
        check_size(config.size)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            size: config.size,
            state: Arc::new(ExecutionState::new(config.step_delay)),
            board: Mutex::new(Board::empty(config.size)),
            solutions: Mutex::new(SolutionSet::new()),
            next_strategy: config.next_strategy,
            rng: Mutex::new(rng),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn next_strategy(&self) -> NextStrategy {
        self.next_strategy
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Command surface for another thread
    pub fn handle(&self) -> ControlHandle {
        ControlHandle::new(Arc::clone(&self.state))
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Board as of the last completed command
    pub fn board(&self) -> Board {
        lock(&self.board).clone()
    }

    pub fn solution_count(&self) -> usize {
        lock(&self.solutions).len()
    }

    pub fn current_solution(&self) -> Option<Solution> {
        lock(&self.solutions).current().cloned()
    }

    /// 1-based cursor position and total
    pub fn solution_position(&self) -> Option<(usize, usize)> {
        lock(&self.solutions).position()
    }

    pub fn solutions(&self) -> Vec<Solution> {
        lock(&self.solutions).iter().cloned().collect()
    }

    pub fn pause(&self) -> ControlResult<()> {
        self.handle().pause()
    }

    pub fn resume(&self) -> ControlResult<()> {
        self.handle().resume()
    }

    pub fn toggle_pause(&self) -> ControlResult<bool> {
        self.handle().toggle_pause()
    }

    pub fn cancel(&self) -> ControlResult<()> {
        self.handle().cancel()
    }

    pub fn set_step_delay(&self, delay: Duration) {
        self.handle().set_step_delay(delay)
    }

    pub fn set_speed(&self, speed: Speed) {
        self.handle().set_speed(speed)
    }

    /// Solve from an empty board, blocking until the run ends.
    ///
    /// `observer` receives a `Started` event and, in the animated modes,
    /// every kernel step. Pause, resume, cancel and speed changes from other
    /// threads reach the kernel at its next checkpoint. The run slot is
    /// released before this returns, whatever the outcome.
    pub fn start<O>(&self, mode: Mode, observer: &mut O) -> ControlResult<SearchOutcome>
    where
        O: Observer + ?Sized,
    {
        let _run = self.claim("start")?;
        if mode.is_visual() {
            self.state.allow_pause();
        }
        let mut board = Board::empty(self.size);
        *lock(&self.board) = board.clone();

        let restore_delay = mode.delay_override().map(|delay| {
            let previous = self.state.step_delay();
            self.state.set_step_delay(delay);
            previous
        });

        info!(%mode, size = self.size, "search started");
        observer.on_step(&StepEvent {
            board: board.clone(),
            kind: StepKind::Started(mode),
            highlight_row: None,
            status: self.state.status(),
        });

        let started = Instant::now();
        let result = if mode.is_visual() {
            search_visual(&mut board, &QueenConstraint, &*self.state, observer)
        } else {
            search_optimized(&mut board, &QueenConstraint, &*self.state)
        };
        let elapsed = started.elapsed();

        if let Some(previous) = restore_delay {
            self.state.set_step_delay(previous);
        }

        let cancelled = self.state.is_cancel_requested();
        let solution = match result {
            SearchResult::Found if !cancelled => board.to_solution(),
            _ => None,
        };
        let outcome = match solution {
            Some(solution) => {
                lock(&self.solutions).record_first(solution.clone());
                *lock(&self.board) = board;
                SearchOutcome::Solved { solution, elapsed }
            }
            None if cancelled || result == SearchResult::Cancelled => {
                lock(&self.board).clear();
                SearchOutcome::Cancelled
            }
            None => {
                lock(&self.board).clear();
                SearchOutcome::Exhausted
            }
        };

        info!(
            %mode,
            size = self.size,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            outcome = outcome_name(&outcome),
            "search finished"
        );
        Ok(outcome)
    }

    /// Look for one solution not yet in the set, using the configured
    /// strategy. On success it is appended and becomes current.
    pub fn find_next(&self) -> ControlResult<NextOutcome> {
        let _run = self.claim("find next solution")?;
        let outcome = match self.next_strategy {
            NextStrategy::Randomized { attempts } => self.next_randomized(attempts),
            NextStrategy::Canonical => self.next_canonical(),
        };

        match &outcome {
            NextOutcome::Appended { solution, index } => {
                debug!(index, notation = %solution, "new distinct solution");
                *lock(&self.board) = Board::from_solution(solution);
            }
            NextOutcome::NoNewSolution => info!("no new distinct solution found"),
            NextOutcome::Cancelled => info!("next-solution search cancelled"),
        }
        Ok(outcome)
    }

    fn next_randomized(&self, attempts: usize) -> NextOutcome {
        let mut rng = lock(&self.rng);
        for _ in 0..attempts {
            let mut board = Board::empty(self.size);
            match search_shuffled(&mut board, &QueenConstraint, &*self.state, &mut *rng) {
                SearchResult::Cancelled => return NextOutcome::Cancelled,
                SearchResult::Exhausted => continue,
                SearchResult::Found => {}
            }
            let Some(solution) = board.to_solution() else {
                continue;
            };
            if let Some(index) = lock(&self.solutions).push_distinct(solution.clone()) {
                return NextOutcome::Appended { solution, index };
            }
        }
        NextOutcome::NoNewSolution
    }

    fn next_canonical(&self) -> NextOutcome {
        // Walk against a snapshot so readers of the set are not blocked
        let seen: HashSet<Solution> = lock(&self.solutions).iter().cloned().collect();
        let mut board = Board::empty(self.size);
        let mut fresh = None;
        let result = enumerate(&mut board, &QueenConstraint, &*self.state, |candidate| {
            match candidate.to_solution() {
                Some(solution) if !seen.contains(&solution) => {
                    fresh = Some(solution);
                    ControlFlow::Break(())
                }
                _ => ControlFlow::Continue(()),
            }
        });

        match (result, fresh) {
            (SearchResult::Cancelled, _) => NextOutcome::Cancelled,
            (_, Some(solution)) => match lock(&self.solutions).push_distinct(solution.clone()) {
                Some(index) => NextOutcome::Appended { solution, index },
                None => NextOutcome::NoNewSolution,
            },
            (_, None) => NextOutcome::NoNewSolution,
        }
    }

    /// Enumerate every solution in ascending column order, replace the set
    /// with them and rewind the cursor. Cancellable.
    pub fn find_all(&self) -> ControlResult<EnumerationOutcome> {
        let _run = self.claim("find all solutions")?;
        let started = Instant::now();
        let mut board = Board::empty(self.size);
        let mut found = Vec::new();
        let result = enumerate(&mut board, &QueenConstraint, &*self.state, |complete| {
            found.extend(complete.to_solution());
            ControlFlow::Continue(())
        });

        if result == SearchResult::Cancelled {
            info!(size = self.size, "enumeration cancelled");
            return Ok(EnumerationOutcome::Cancelled);
        }

        let count = found.len();
        let mut solutions = lock(&self.solutions);
        solutions.replace_all(found);
        *lock(&self.board) = solutions
            .current()
            .map(Board::from_solution)
            .unwrap_or_else(|| Board::empty(self.size));

        info!(
            size = self.size,
            count,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "enumeration complete"
        );
        Ok(EnumerationOutcome::Complete { count })
    }

    /// Move the cursor to the next solution and show it
    pub fn next_view(&self) -> ControlResult<Option<Solution>> {
        self.browse(SolutionSet::advance)
    }

    /// Move the cursor to the previous solution and show it
    pub fn previous_view(&self) -> ControlResult<Option<Solution>> {
        self.browse(SolutionSet::retreat)
    }

    fn browse(
        &self,
        step: fn(&mut SolutionSet) -> Option<&Solution>,
    ) -> ControlResult<Option<Solution>> {
        let _run = self.claim("browse solutions")?;
        let mut solutions = lock(&self.solutions);
        let shown = step(&mut solutions).cloned();
        if let Some(solution) = &shown {
            *lock(&self.board) = Board::from_solution(solution);
        }
        Ok(shown)
    }

    /// Clear the board, the solution set and the cursor
    pub fn reset(&self) -> ControlResult<()> {
        let _run = self.claim("reset")?;
        lock(&self.board).clear();
        lock(&self.solutions).clear();
        debug!("board and solutions reset");
        Ok(())
    }

    fn claim(&self, command: &'static str) -> ControlResult<crate::control::RunGuard<'_>> {
        self.state.begin().map_err(|err| {
            warn!(command, "rejected: a search is already running");
            err
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn outcome_name(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Solved { .. } => "solved",
        SearchOutcome::Exhausted => "exhausted",
        SearchOutcome::Cancelled => "cancelled",
    }
}
