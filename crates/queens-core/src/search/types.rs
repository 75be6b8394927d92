use crate::Board;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a run drives the search kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Animated search at the current step delay
    Stepwise,
    /// Animated search at the `Fast` preset, whatever the current speed
    Fast,
    /// Optimized kernel, no step events
    Instant,
}

impl Mode {
    /// Step delay forced for the duration of a run
    pub fn delay_override(&self) -> Option<Duration> {
        match self {
            Mode::Fast => Some(Speed::Fast.delay()),
            Mode::Stepwise | Mode::Instant => None,
        }
    }

    /// Whether the visual kernel (events, pause, delay) is used
    pub fn is_visual(&self) -> bool {
        !matches!(self, Mode::Instant)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Stepwise => write!(f, "Step by step"),
            Mode::Fast => write!(f, "Fast"),
            Mode::Instant => write!(f, "Instant"),
        }
    }
}

/// Step delay presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    pub fn delay(&self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(800),
            Speed::Medium => Duration::from_millis(300),
            Speed::Fast => Duration::from_millis(100),
        }
    }

    /// Classify an arbitrary delay for display
    pub fn classify(delay: Duration) -> Speed {
        if delay > Duration::from_millis(500) {
            Speed::Slow
        } else if delay > Duration::from_millis(200) {
            Speed::Medium
        } else {
            Speed::Fast
        }
    }

    pub fn all() -> &'static [Speed] {
        &[Speed::Slow, Speed::Medium, Speed::Fast]
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speed::Slow => write!(f, "Slow"),
            Speed::Medium => write!(f, "Medium"),
            Speed::Fast => write!(f, "Fast"),
        }
    }
}

impl std::str::FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(Speed::Slow),
            "medium" => Ok(Speed::Medium),
            "fast" => Ok(Speed::Fast),
            other => Err(format!("unknown speed '{}' (slow, medium, fast)", other)),
        }
    }
}

/// Tri-state result propagated up the recursion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// A complete placement is on the board
    Found,
    /// The subtree holds no (further) placement
    Exhausted,
    /// Cancellation was observed; unwind without further work
    Cancelled,
}

/// What a step event narrates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Started(Mode),
    Searching { row: usize },
    Placed { row: usize, col: usize },
    Backtracking { row: usize },
    SolutionFound,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Started(Mode::Stepwise) => write!(f, "Starting animated search..."),
            StepKind::Started(Mode::Fast) => write!(f, "Solving quickly..."),
            StepKind::Started(Mode::Instant) => write!(f, "Solving instantly..."),
            StepKind::Searching { row } => {
                write!(f, "Searching for a square for queen {}", row + 1)
            }
            StepKind::Placed { row, col } => {
                write!(f, "Queen {} placed in column {}", row + 1, col + 1)
            }
            StepKind::Backtracking { row } => write!(f, "Backtracking from row {}", row + 1),
            StepKind::SolutionFound => write!(f, "Solution found!"),
        }
    }
}

/// Execution status attached to each event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Normal,
    Paused,
    Cancelling,
}

/// One observation of the running search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEvent {
    pub board: Board,
    pub kind: StepKind,
    /// Row to highlight while searching it
    pub highlight_row: Option<usize>,
    pub status: StepStatus,
}

impl StepEvent {
    /// Narrative label for the event
    pub fn label(&self) -> String {
        self.kind.to_string()
    }
}

/// Receiver of step events (the renderer side).
///
/// Implementations should return promptly; the kernel owns the step delay.
pub trait Observer {
    fn on_step(&mut self, event: &StepEvent);
}

impl<F: FnMut(&StepEvent)> Observer for F {
    fn on_step(&mut self, event: &StepEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_presets() {
        assert_eq!(Speed::Slow.delay(), Duration::from_millis(800));
        assert_eq!(Speed::Medium.delay(), Duration::from_millis(300));
        assert_eq!(Speed::Fast.delay(), Duration::from_millis(100));

        for speed in Speed::all() {
            assert_eq!(Speed::classify(speed.delay()), *speed);
        }
        assert_eq!(Speed::classify(Duration::from_millis(500)), Speed::Medium);
        assert_eq!(Speed::classify(Duration::ZERO), Speed::Fast);
    }

    #[test]
    fn test_speed_from_str() {
        assert_eq!("slow".parse::<Speed>(), Ok(Speed::Slow));
        assert_eq!("FAST".parse::<Speed>(), Ok(Speed::Fast));
        assert!("warp".parse::<Speed>().is_err());
    }

    #[test]
    fn test_mode_delay_override() {
        assert_eq!(Mode::Fast.delay_override(), Some(Duration::from_millis(100)));
        assert_eq!(Mode::Stepwise.delay_override(), None);
        assert!(!Mode::Instant.is_visual());
    }

    #[test]
    fn test_step_labels_are_one_based() {
        assert_eq!(
            StepKind::Placed { row: 0, col: 4 }.to_string(),
            "Queen 1 placed in column 5"
        );
        assert_eq!(
            StepKind::Searching { row: 2 }.to_string(),
            "Searching for a square for queen 3"
        );
        assert_eq!(
            StepKind::Backtracking { row: 7 }.to_string(),
            "Backtracking from row 8"
        );
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        let mut observer = |event: &StepEvent| seen.push(event.kind);
        let event = StepEvent {
            board: Board::empty(4),
            kind: StepKind::SolutionFound,
            highlight_row: None,
            status: StepStatus::Normal,
        };
        observer.on_step(&event);
        assert_eq!(seen, vec![StepKind::SolutionFound]);
    }
}
