//! `queens solve`: search without the terminal UI and print the result.

use queens_core::{
    Board, ControlError, Controller, ControllerConfig, EnumerationOutcome, Mode, SearchOutcome,
    StepEvent,
};
use std::io::{self, Write};
use std::time::Instant;

fn invalid(error: ControlError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

/// Solve an N×N board once, or enumerate every solution with `all`.
/// `limit` caps how many enumerated solutions are printed.
pub fn solve<W: Write>(
    out: &mut W,
    size: usize,
    all: bool,
    limit: Option<usize>,
) -> io::Result<()> {
    let controller =
        Controller::new(ControllerConfig::default().with_size(size)).map_err(invalid)?;

    if all {
        return enumerate(out, &controller, limit);
    }

    match controller.start(Mode::Instant, &mut |_: &StepEvent| {}) {
        Ok(SearchOutcome::Solved { solution, elapsed }) => {
            writeln!(out, "{}", Board::from_solution(&solution))?;
            writeln!(out)?;
            writeln!(out, "{}", solution.notation())?;
            writeln!(out, "Solved in {:.3} ms", elapsed.as_secs_f64() * 1000.0)?;
        }
        Ok(SearchOutcome::Exhausted) => {
            writeln!(out, "No solution exists for {size}x{size}")?;
        }
        Ok(SearchOutcome::Cancelled) => writeln!(out, "Search cancelled")?,
        Err(e) => return Err(invalid(e)),
    }
    Ok(())
}

fn enumerate<W: Write>(
    out: &mut W,
    controller: &Controller,
    limit: Option<usize>,
) -> io::Result<()> {
    let size = controller.size();
    let started = Instant::now();
    let count = match controller.find_all().map_err(invalid)? {
        EnumerationOutcome::Complete { count } => count,
        EnumerationOutcome::Cancelled => {
            writeln!(out, "Enumeration cancelled")?;
            return Ok(());
        }
    };
    let elapsed = started.elapsed();

    let solutions = controller.solutions();
    let shown = limit.unwrap_or(count).min(count);
    for (i, solution) in solutions.iter().take(shown).enumerate() {
        writeln!(out, "{:>6}. {}", i + 1, solution.notation())?;
    }
    if shown < count {
        writeln!(out, "   ... {} more", count - shown)?;
    }
    writeln!(
        out,
        "{} solutions for {}x{} in {:.3} ms",
        count,
        size,
        size,
        elapsed.as_secs_f64() * 1000.0
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(size: usize, all: bool, limit: Option<usize>) -> String {
        let mut out = Vec::new();
        solve(&mut out, size, all, limit).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_solution() {
        let text = run(8, false, None);
        assert!(text.contains("a8, e7, h6, f5, c4, g3, b2, d1"));
        assert!(text.contains("Solved in"));
    }

    #[test]
    fn test_unsolvable_size() {
        assert!(run(3, false, None).contains("No solution exists for 3x3"));
    }

    #[test]
    fn test_all_with_limit() {
        let text = run(6, true, Some(2));
        assert_eq!(text.lines().filter(|line| line.contains(", ")).count(), 2);
        assert!(text.contains("... 2 more"));
        assert!(text.contains("4 solutions for 6x6"));
    }

    #[test]
    fn test_invalid_size() {
        let mut out = Vec::new();
        let err = solve(&mut out, 0, false, None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
