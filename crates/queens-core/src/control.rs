//! Execution state shared between the searching thread and the control actor.
//!
//! The control actor (a UI callback, another thread) only writes `paused`,
//! `cancel_requested` and the step delay; the searching thread only reads
//! them at checkpoints. Writes use `Release` and reads `Acquire`, and every
//! write is followed by a wake-up so a thread suspended on a pause or a step
//! delay re-evaluates immediately instead of waiting out its timeout.

use crate::error::{ControlError, ControlResult};
use crate::search::{Speed, StepStatus};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Re-poll interval of the pause wait
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Step delay before any speed is chosen
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);

/// Suspension points the search kernel polls
pub trait Checkpoint {
    /// Whether the run must unwind now
    fn cancelled(&self) -> bool;

    /// Block while paused. Returns `true` if the run was cancelled.
    fn hold_if_paused(&self) -> bool;

    /// Suspend for the step delay; returns early on cancellation
    fn pace(&self);

    /// Status to stamp on the next step event
    fn status(&self) -> StepStatus;
}

/// Run flags plus the step delay
#[derive(Debug)]
pub struct ExecutionState {
    running: AtomicBool,
    /// Whether the active run polls the pause flag
    pausable: AtomicBool,
    paused: AtomicBool,
    cancel_requested: AtomicBool,
    step_delay_ms: AtomicU64,
    gate: Mutex<()>,
    wake: Condvar,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

impl ExecutionState {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            running: AtomicBool::new(false),
            pausable: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            step_delay_ms: AtomicU64::new(duration_ms(step_delay)),
            gate: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether the active run honours pause. The silent kernels only
    /// check for cancellation.
    pub fn is_pausable(&self) -> bool {
        self.pausable.load(Ordering::Acquire)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.load(Ordering::Acquire))
    }

    /// Change the step delay; a suspension already in progress picks it up
    pub fn set_step_delay(&self, delay: Duration) {
        self.step_delay_ms.store(duration_ms(delay), Ordering::Release);
        self.notify();
    }

    /// Mark the run just claimed as one that stops at pause checkpoints
    pub(crate) fn allow_pause(&self) {
        self.pausable.store(true, Ordering::Release);
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
        self.notify();
    }

    /// Request cancellation. Also clears `paused`, so a run held by a
    /// pause wakes up and unwinds.
    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
        self.paused.store(false, Ordering::Release);
        self.notify();
    }

    /// Claim the single run slot
    pub(crate) fn begin(&self) -> ControlResult<RunGuard<'_>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ControlError::AlreadyRunning);
        }
        self.pausable.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);
        self.cancel_requested.store(false, Ordering::Release);
        Ok(RunGuard { state: self })
    }

    fn finish(&self) {
        self.pausable.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);
        self.cancel_requested.store(false, Ordering::Release);
        self.running.store(false, Ordering::Release);
        self.notify();
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        let _gate = self.lock_gate();
        self.wake.notify_all();
    }
}

impl Checkpoint for ExecutionState {
    fn cancelled(&self) -> bool {
        self.is_cancel_requested()
    }

    fn hold_if_paused(&self) -> bool {
        if self.is_paused() && !self.is_cancel_requested() {
            debug!("search held by pause");
            let mut gate = self.lock_gate();
            while self.is_paused() && !self.is_cancel_requested() {
                gate = self
                    .wake
                    .wait_timeout(gate, PAUSE_POLL_INTERVAL)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        }
        self.is_cancel_requested()
    }

    fn pace(&self) {
        let started = Instant::now();
        let mut gate = self.lock_gate();
        loop {
            if self.is_cancel_requested() {
                return;
            }
            // Re-read each wake so a speed change applies to this suspension
            let Some(remaining) = self.step_delay().checked_sub(started.elapsed()) else {
                return;
            };
            if remaining.is_zero() {
                return;
            }
            gate = self
                .wake
                .wait_timeout(gate, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    fn status(&self) -> StepStatus {
        if self.is_cancel_requested() {
            StepStatus::Cancelling
        } else if self.is_paused() {
            StepStatus::Paused
        } else {
            StepStatus::Normal
        }
    }
}

/// Holds the run slot; releasing it clears every run flag, on any exit path
pub(crate) struct RunGuard<'a> {
    state: &'a ExecutionState,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.finish();
    }
}

/// Cloneable command surface for the control actor
#[derive(Debug, Clone)]
pub struct ControlHandle {
    state: Arc<ExecutionState>,
}

impl ControlHandle {
    pub(crate) fn new(state: Arc<ExecutionState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn pause(&self) -> ControlResult<()> {
        self.require_running("pause")?;
        if !self.state.is_pausable() {
            warn!("ignored: pause does not apply to this search");
            return Err(ControlError::NotPausable);
        }
        self.state.set_paused(true);
        debug!("search paused");
        Ok(())
    }

    pub fn resume(&self) -> ControlResult<()> {
        self.require_running("resume")?;
        self.state.set_paused(false);
        debug!("search resumed");
        Ok(())
    }

    /// Flip the pause flag; returns whether the run is now paused
    pub fn toggle_pause(&self) -> ControlResult<bool> {
        if self.state.is_paused() {
            self.resume().map(|_| false)
        } else {
            self.pause().map(|_| true)
        }
    }

    pub fn cancel(&self) -> ControlResult<()> {
        self.require_running("cancel")?;
        self.state.request_cancel();
        debug!("search cancellation requested");
        Ok(())
    }

    /// Takes effect immediately, including mid-run
    pub fn set_step_delay(&self, delay: Duration) {
        self.state.set_step_delay(delay);
        debug!(
            delay_ms = duration_ms(delay),
            speed = %Speed::classify(delay),
            "step delay changed"
        );
    }

    pub fn set_speed(&self, speed: Speed) {
        self.set_step_delay(speed.delay());
    }

    fn require_running(&self, command: &'static str) -> ControlResult<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            warn!(command, "ignored: no search in progress");
            Err(ControlError::NothingRunning { command })
        }
    }
}

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_single_run_slot() {
        let state = ExecutionState::default();
        let guard = state.begin().unwrap();
        assert!(state.is_running());
        assert!(matches!(state.begin(), Err(ControlError::AlreadyRunning)));
        drop(guard);
        assert!(!state.is_running());
        assert!(state.begin().is_ok());
    }

    #[test]
    fn test_guard_clears_flags() {
        let state = ExecutionState::default();
        {
            let _guard = state.begin().unwrap();
            state.set_paused(true);
            state.request_cancel();
        }
        assert!(!state.is_running());
        assert!(!state.is_paused());
        assert!(!state.is_cancel_requested());
    }

    #[test]
    fn test_cancel_clears_pause() {
        let state = ExecutionState::default();
        let _guard = state.begin().unwrap();
        state.set_paused(true);
        assert_eq!(state.status(), StepStatus::Paused);

        state.request_cancel();
        assert!(!state.is_paused());
        assert_eq!(state.status(), StepStatus::Cancelling);
        assert!(state.hold_if_paused());
    }

    #[test]
    fn test_handle_noop_when_idle() {
        let handle = ControlHandle::new(Arc::new(ExecutionState::default()));
        assert_eq!(
            handle.pause(),
            Err(ControlError::NothingRunning { command: "pause" })
        );
        assert!(handle.cancel().unwrap_err().is_noop());
        assert!(handle.toggle_pause().is_err());
        assert!(!handle.state().is_paused());

        // Speed can be chosen between runs
        handle.set_speed(Speed::Slow);
        assert_eq!(handle.state().step_delay(), Duration::from_millis(800));
    }

    #[test]
    fn test_toggle_pause() {
        let state = Arc::new(ExecutionState::default());
        let handle = ControlHandle::new(Arc::clone(&state));
        let _guard = state.begin().unwrap();
        state.allow_pause();

        assert_eq!(handle.toggle_pause(), Ok(true));
        assert!(state.is_paused());
        assert_eq!(handle.toggle_pause(), Ok(false));
        assert!(!state.is_paused());
    }

    #[test]
    fn test_pause_rejected_for_silent_runs() {
        let state = Arc::new(ExecutionState::default());
        let handle = ControlHandle::new(Arc::clone(&state));
        {
            let _guard = state.begin().unwrap();
            assert_eq!(handle.pause(), Err(ControlError::NotPausable));
            assert!(handle.toggle_pause().unwrap_err().is_noop());
            assert!(!state.is_paused());
            assert_eq!(state.status(), StepStatus::Normal);
            assert!(handle.cancel().is_ok());
        }

        // The permission ends with the run
        {
            let _guard = state.begin().unwrap();
            state.allow_pause();
            assert!(handle.pause().is_ok());
        }
        assert!(!state.is_pausable());
    }

    #[test]
    fn test_zero_delay_does_not_block() {
        let state = ExecutionState::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..1000 {
            state.pace();
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_pace_cut_short_by_cancel() {
        let state = Arc::new(ExecutionState::new(Duration::from_secs(30)));
        let _guard = state.begin().unwrap();

        let canceller = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                state.request_cancel();
            })
        };

        let started = Instant::now();
        state.pace();
        assert!(started.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();
    }

    #[test]
    fn test_pace_follows_speed_change() {
        let state = Arc::new(ExecutionState::new(Duration::from_secs(30)));

        let changer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                state.set_step_delay(Duration::from_millis(1));
            })
        };

        let started = Instant::now();
        state.pace();
        assert!(started.elapsed() < Duration::from_secs(5));
        changer.join().unwrap();
    }

    #[test]
    fn test_pause_released_by_resume() {
        let state = Arc::new(ExecutionState::default());
        let _guard = state.begin().unwrap();
        state.set_paused(true);

        let resumer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                state.set_paused(false);
            })
        };

        assert!(!state.hold_if_paused());
        assert!(!state.is_paused());
        resumer.join().unwrap();
    }
}
