//! Basic example of using the N-Queens engine

use queens_core::{
    Board, Controller, ControllerConfig, Mode, NextOutcome, NextStrategy, SearchOutcome,
    StepEvent, StepKind,
};
use std::time::Duration;

fn main() {
    let controller = Controller::new(
        ControllerConfig::default()
            .with_step_delay(Duration::ZERO)
            .with_next_strategy(NextStrategy::Canonical),
    )
    .expect("eight queens is a supported size");

    // Solve instantly
    println!("Solving eight queens instantly...\n");
    match controller.start(Mode::Instant, &mut |_: &StepEvent| {}) {
        Ok(SearchOutcome::Solved { solution, elapsed }) => {
            println!("{}\n", Board::from_solution(&solution));
            println!("Positions: {}", solution);
            println!("Solved in {:.2} ms\n", elapsed.as_secs_f64() * 1000.0);
        }
        Ok(other) => println!("No solution: {:?}", other),
        Err(e) => println!("Error: {}", e),
    }

    // Watch the same search step by step
    println!("--- Stepwise search on a 4x4 board ---\n");
    let small = Controller::new(
        ControllerConfig::default()
            .with_size(4)
            .with_step_delay(Duration::ZERO),
    )
    .expect("four queens is a supported size");
    let mut steps = 0;
    let _ = small.start(Mode::Stepwise, &mut |event: &StepEvent| {
        steps += 1;
        if matches!(event.kind, StepKind::SolutionFound) {
            println!("{}\n", event.board);
        }
        println!("{:>3}. {}", steps, event.label());
    });

    // A few more distinct solutions
    println!("\n--- Next distinct solutions ---\n");
    for _ in 0..3 {
        if let Ok(NextOutcome::Appended { solution, index }) = controller.find_next() {
            println!("Solution {}: {}", index + 1, solution);
        }
    }

    // All of them
    if let Ok(outcome) = controller.find_all() {
        println!("\nEnumeration: {:?}", outcome);
        for (i, solution) in controller.solutions().iter().take(5).enumerate() {
            println!("Solution {}: {}", i + 1, solution);
        }
    }
}
