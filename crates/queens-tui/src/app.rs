use crate::settings::Settings;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use queens_core::{
    Board, Checkpoint, ControlError, Controller, ControllerConfig, EnumerationOutcome, Mode,
    NextOutcome, SearchOutcome, Speed, StepEvent, StepKind, StepStatus,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// A user command, decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RunStepwise,
    RunFast,
    RunInstant,
    FindNextSolution,
    FindAllSolutions,
    ResetBoard,
    TogglePause,
    Cancel,
    SetSpeed(Speed),
    NextView,
    PreviousView,
    ToggleTheme,
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }

        let command = match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => Command::RunStepwise,
            KeyCode::Char('f') | KeyCode::Char('F') => Command::RunFast,
            KeyCode::Char('i') | KeyCode::Char('I') => Command::RunInstant,
            KeyCode::Char('n') | KeyCode::Char('N') => Command::FindNextSolution,
            KeyCode::Char('a') | KeyCode::Char('A') => Command::FindAllSolutions,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::ResetBoard,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Command::TogglePause,
            KeyCode::Char('x') | KeyCode::Char('X') => Command::Cancel,
            KeyCode::Char('1') => Command::SetSpeed(Speed::Slow),
            KeyCode::Char('2') => Command::SetSpeed(Speed::Medium),
            KeyCode::Char('3') => Command::SetSpeed(Speed::Fast),
            KeyCode::Right => Command::NextView,
            KeyCode::Left => Command::PreviousView,
            KeyCode::Char('t') | KeyCode::Char('T') => Command::ToggleTheme,
            KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// What a finished worker reports back
#[derive(Debug)]
enum Report {
    Search(SearchOutcome),
    Next(NextOutcome),
    All(EnumerationOutcome),
}

enum WorkerMessage {
    Step(StepEvent),
    Finished(Result<Report, ControlError>),
}

/// The main application state
pub struct App {
    controller: Arc<Controller>,
    /// Color theme
    pub theme: Theme,
    /// Persisted preferences
    pub settings: Settings,
    /// Latest board snapshot
    pub board: Board,
    /// Row being searched, if any
    pub highlight_row: Option<usize>,
    /// Label of the latest step
    pub step_label: Option<String>,
    /// Steps observed in the current run
    pub steps: u64,
    /// Wall time of the last solved run
    pub last_elapsed: Option<Duration>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    workers: Vec<JoinHandle<()>>,
    persist: bool,
}

impl App {
    /// Create the app from persisted settings
    pub fn new(settings: Settings) -> Result<Self, ControlError> {
        let controller = Controller::new(
            ControllerConfig::default()
                .with_size(settings.size)
                .with_speed(settings.speed)
                .with_next_strategy(settings.next_strategy()),
        )?;
        let mut app = Self::with_controller(controller, settings);
        app.persist = true;
        Ok(app)
    }

    /// Create the app around an existing controller. Settings changes are
    /// not written to disk.
    pub fn with_controller(controller: Controller, settings: Settings) -> Self {
        let (tx, rx) = mpsc::channel();
        let theme = if settings.light_theme {
            Theme::light()
        } else {
            Theme::dark()
        };
        Self {
            board: controller.board(),
            controller: Arc::new(controller),
            theme,
            settings,
            highlight_row: None,
            step_label: None,
            steps: 0,
            last_elapsed: None,
            message: None,
            message_timer: 0,
            tx,
            rx,
            workers: Vec::new(),
            persist: false,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Get the tick rate; faster while a search is animating
    pub fn get_tick_rate(&self) -> Duration {
        if self.controller.is_running() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    /// Status of the active run, for the title banner
    pub fn status(&self) -> StepStatus {
        if self.controller.is_running() {
            self.controller.state().status()
        } else {
            StepStatus::Normal
        }
    }

    /// Whether a worker thread is still alive
    pub fn is_busy(&self) -> bool {
        self.workers.iter().any(|worker| !worker.is_finished())
    }

    /// Drain worker messages and update timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        while let Ok(message) = self.rx.try_recv() {
            match message {
                WorkerMessage::Step(event) => self.observe(event),
                WorkerMessage::Finished(result) => self.finish(result),
            }
        }
        self.workers.retain(|worker| !worker.is_finished());
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match Command::from_key(key) {
            Some(command) => self.execute(command),
            None => AppAction::Continue,
        }
    }

    pub fn execute(&mut self, command: Command) -> AppAction {
        match command {
            Command::RunStepwise => self.run_search(Mode::Stepwise),
            Command::RunFast => self.run_search(Mode::Fast),
            Command::RunInstant => self.run_search(Mode::Instant),
            Command::FindNextSolution => {
                self.spawn(|controller, _| controller.find_next().map(Report::Next))
            }
            Command::FindAllSolutions => {
                self.show_message("Enumerating all solutions...");
                self.spawn(|controller, _| controller.find_all().map(Report::All))
            }
            Command::ResetBoard => match self.controller.reset() {
                Ok(()) => {
                    self.board = self.controller.board();
                    self.highlight_row = None;
                    self.step_label = None;
                    self.steps = 0;
                    self.last_elapsed = None;
                    self.show_message("Board reset");
                }
                Err(e) => self.show_error(&e),
            },
            Command::TogglePause => match self.controller.toggle_pause() {
                Ok(true) => self.show_message("Paused"),
                Ok(false) => self.show_message("Resumed"),
                Err(e) => self.show_error(&e),
            },
            Command::Cancel => match self.controller.cancel() {
                Ok(()) => self.show_message("Stopping..."),
                Err(e) => self.show_error(&e),
            },
            Command::SetSpeed(speed) => {
                self.controller.set_speed(speed);
                self.settings.speed = speed;
                self.save_settings();
                self.show_message(&format!("Speed: {}", speed));
            }
            Command::NextView => self.browse(true),
            Command::PreviousView => self.browse(false),
            Command::ToggleTheme => {
                self.settings.light_theme = !self.settings.light_theme;
                self.theme = if self.settings.light_theme {
                    Theme::light()
                } else {
                    Theme::dark()
                };
                self.save_settings();
            }
            Command::Quit => return AppAction::Quit,
        }
        AppAction::Continue
    }

    /// Cancel any active run and wait for the workers to exit
    pub fn shutdown(&mut self) {
        if self.controller.is_running() {
            let _ = self.controller.cancel();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("search worker panicked");
            }
        }
    }

    fn run_search(&mut self, mode: Mode) {
        self.spawn(move |controller, tx| {
            controller
                .start(mode, &mut |event: &StepEvent| {
                    let _ = tx.send(WorkerMessage::Step(event.clone()));
                })
                .map(Report::Search)
        });
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&Controller, &Sender<WorkerMessage>) -> Result<Report, ControlError>
            + Send
            + 'static,
    {
        if self.controller.is_running() {
            self.show_error(&ControlError::AlreadyRunning);
            return;
        }
        let controller = Arc::clone(&self.controller);
        let tx = self.tx.clone();
        self.workers.push(thread::spawn(move || {
            let result = job(&controller, &tx);
            let _ = tx.send(WorkerMessage::Finished(result));
        }));
    }

    fn browse(&mut self, forward: bool) {
        let shown = if forward {
            self.controller.next_view()
        } else {
            self.controller.previous_view()
        };
        match shown {
            Ok(Some(_)) => {
                self.board = self.controller.board();
                self.highlight_row = None;
            }
            Ok(None) => self.show_message("No solutions yet"),
            Err(e) => self.show_error(&e),
        }
    }

    fn observe(&mut self, event: StepEvent) {
        if matches!(event.kind, StepKind::Started(_)) {
            self.steps = 0;
            self.last_elapsed = None;
        } else {
            self.steps += 1;
        }
        self.step_label = Some(event.label());
        self.highlight_row = event.highlight_row;
        self.board = event.board;
    }

    fn finish(&mut self, result: Result<Report, ControlError>) {
        self.highlight_row = None;
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.show_error(&e);
                return;
            }
        };
        self.board = self.controller.board();

        match report {
            Report::Search(SearchOutcome::Solved { elapsed, .. }) => {
                self.last_elapsed = Some(elapsed);
                self.show_message(&format!(
                    "Solution found in {:.2} ms",
                    elapsed.as_secs_f64() * 1000.0
                ));
            }
            Report::Search(SearchOutcome::Exhausted) => {
                let size = self.controller.size();
                self.show_message(&format!("No solution exists for {size}x{size}"));
            }
            Report::Search(SearchOutcome::Cancelled) => {
                self.step_label = None;
                self.show_message("Search cancelled");
            }
            Report::Next(NextOutcome::Appended { index, .. }) => {
                self.show_message(&format!("New solution #{}", index + 1));
            }
            Report::Next(NextOutcome::NoNewSolution) => {
                self.show_message("No new solution found");
            }
            Report::Next(NextOutcome::Cancelled) | Report::All(EnumerationOutcome::Cancelled) => {
                self.show_message("Cancelled");
            }
            Report::All(EnumerationOutcome::Complete { count }) => {
                self.show_message(&format!("Found {} solutions", count));
            }
        }
    }

    fn show_error(&mut self, error: &ControlError) {
        self.show_message(&error.to_string());
    }

    fn save_settings(&self) {
        if self.persist {
            self.settings.save();
        }
    }
}
