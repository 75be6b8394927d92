//! N-Queens search engine with a controllable execution protocol.
//!
//! A [`Controller`] runs the backtracking search step by step, throttled,
//! or to completion, while another thread pauses, resumes, cancels or
//! re-paces it through a [`ControlHandle`]. Discovered solutions collect in
//! a deduplicated, cursor-indexed [`SolutionSet`].
//!
//! ```
//! use queens_core::{Controller, ControllerConfig, Mode, SearchOutcome, StepEvent};
//!
//! let controller = Controller::new(ControllerConfig::default()).unwrap();
//! let outcome = controller.start(Mode::Instant, &mut |_: &StepEvent| {}).unwrap();
//! if let SearchOutcome::Solved { solution, .. } = outcome {
//!     assert_eq!(solution.squares()[0], "a8");
//! }
//! ```

mod board;
mod control;
mod controller;
mod error;
pub mod search;
mod solutions;

pub use board::{file_letter, square_name, Board, Solution, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
pub use control::{
    Checkpoint, ControlHandle, ExecutionState, DEFAULT_STEP_DELAY, PAUSE_POLL_INTERVAL,
};
pub use controller::{
    Controller, ControllerConfig, EnumerationOutcome, NextOutcome, NextStrategy, SearchOutcome,
    DEFAULT_NEXT_ATTEMPTS,
};
pub use error::{ControlError, ControlResult};
pub use search::{Mode, Observer, Speed, StepEvent, StepKind, StepStatus};
pub use solutions::SolutionSet;
