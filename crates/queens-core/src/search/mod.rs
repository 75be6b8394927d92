//! Backtracking kernels.
//!
//! All kernels place one queen per row, top-down, consult a [`Constraint`]
//! for every candidate cell and poll a [`Checkpoint`] so an outside actor
//! can pause or cancel them. Results propagate up the recursion as a
//! [`SearchResult`]; there are no non-local exits.

mod optimized;
mod types;
mod validator;
mod visual;

pub use crate::control::Checkpoint;
pub use optimized::{enumerate, search_optimized, search_shuffled};
pub use types::{Mode, Observer, SearchResult, Speed, StepEvent, StepKind, StepStatus};
pub use validator::{is_safe, Constraint, QueenConstraint};
pub use visual::search_visual;
