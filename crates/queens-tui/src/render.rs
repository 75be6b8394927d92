use crate::app::App;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use queens_core::{file_letter, NextStrategy, Speed, StepStatus};
use std::io;

/// Width of one square: " Q "
const CELL_WIDTH: u16 = 3;
/// Room for the rank labels left of the board
const LABEL_WIDTH: u16 = 3;
const INFO_WIDTH: u16 = 28;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;
    execute!(
        stdout,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    let size = app.board.size() as u16;
    let board_width = LABEL_WIDTH + size * CELL_WIDTH;
    let total_width = board_width + 4 + INFO_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > size + 14 { 2 } else { 1 };

    render_title(stdout, app, start_x, start_y)?;
    render_board(stdout, app, start_x, start_y + 2)?;
    render_info_panel(stdout, app, start_x + board_width + 4, start_y + 2)?;

    let notation_y = start_y + 2 + size + 2;
    render_notation(stdout, app, start_x, notation_y)?;
    render_controls(stdout, app, start_x, notation_y + 2)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_title(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let label = app.step_label.as_deref().unwrap_or("Ready");

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.fg),
        Print(label)
    )?;

    let suffix = match app.status() {
        StepStatus::Normal => None,
        StepStatus::Paused => Some(" [PAUSED]"),
        StepStatus::Cancelling => Some(" [STOPPING...]"),
    };
    if let Some(suffix) = suffix {
        execute!(stdout, SetForegroundColor(theme.warning), Print(suffix))?;
    }
    Ok(())
}

fn render_board(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let board = &app.board;
    let size = board.size();
    let queen_color = if board.is_complete() {
        theme.solved
    } else {
        theme.queen
    };

    for row in 0..size {
        let cell_y = y + row as u16;
        execute!(
            stdout,
            MoveTo(x, cell_y),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.label),
            Print(format!("{:>2} ", size - row))
        )?;

        let highlighted = app.highlight_row == Some(row);
        for col in 0..size {
            let bg = if highlighted {
                theme.highlight_bg
            } else {
                theme.square(row, col)
            };
            let glyph = if board.get(row) == Some(col) { " Q " } else { "   " };
            execute!(
                stdout,
                SetBackgroundColor(bg),
                SetForegroundColor(queen_color),
                Print(glyph)
            )?;
        }
    }

    // File letters
    execute!(
        stdout,
        MoveTo(x + LABEL_WIDTH, y + size as u16),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.label)
    )?;
    for col in 0..size {
        execute!(stdout, Print(format!(" {} ", file_letter(col))))?;
    }

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let controller = app.controller();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ N-QUEENS ═══")
    )?;

    let size = controller.size();
    let speed = Speed::classify(controller.state().step_delay());
    let next = match controller.next_strategy() {
        NextStrategy::Randomized { .. } => "random",
        NextStrategy::Canonical => "ordered",
    };
    let solutions = match controller.solution_position() {
        Some((k, n)) => format!("{}/{}", k, n),
        None => "none".to_string(),
    };
    let elapsed = match app.last_elapsed {
        Some(elapsed) => format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0),
        None => "-".to_string(),
    };

    let lines = [
        format!("Board: {:>12}", format!("{}x{}", size, size)),
        format!("Speed: {:>12}", speed.to_string()),
        format!("Next: {:>13}", next),
        format!("Solution: {:>9}", solutions),
        format!("Steps: {:>12}", app.steps),
        format!("Time: {:>13}", elapsed),
    ];
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + 2 + i as u16 * 2),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }

    Ok(())
}

fn render_notation(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let Some(solution) = app.board.to_solution() else {
        return Ok(());
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.solved),
        Print(solution.notation())
    )?;
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("s", "Animate"),
        ("f", "Fast"),
        ("i", "Instant"),
        ("n", "Next solution"),
        ("a", "All solutions"),
        ("r", "Reset"),
        ("p/Space", "Pause"),
        ("x", "Cancel"),
        ("1/2/3", "Speed"),
        ("←/→", "Browse"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 3 columns (4 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 24;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>8}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.highlight_bg),
        Print(&padded)
    )?;

    Ok(())
}
