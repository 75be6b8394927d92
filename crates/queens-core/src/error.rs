/// Result type for controller operations
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors reported by the execution controller.
///
/// None of these are fatal: the controller is always left idle and
/// consistent, and an active run is never disturbed by a rejected command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// A run, reset or enumeration was requested while a run is active
    AlreadyRunning,
    /// A control command arrived with nothing running; it was ignored
    NothingRunning { command: &'static str },
    /// Pause requested for a run that only stops on cancel
    NotPausable,
    /// Board size outside `1..=MAX_BOARD_SIZE`
    InvalidSize { size: usize },
}

impl ControlError {
    /// Whether the error is a no-op warning rather than a rejected request
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            ControlError::NothingRunning { .. } | ControlError::NotPausable
        )
    }
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::AlreadyRunning => write!(f, "A search is already running"),
            ControlError::NothingRunning { command } => {
                write!(f, "No search in progress to {}", command)
            }
            ControlError::NotPausable => {
                write!(f, "This search cannot be paused, only cancelled")
            }
            ControlError::InvalidSize { size } => write!(
                f,
                "Board size {} is not supported (expected 1..={})",
                size,
                crate::MAX_BOARD_SIZE
            ),
        }
    }
}

impl std::error::Error for ControlError {}
