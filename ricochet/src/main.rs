//! ricochet: load a board, find the fewest moves for one robot to reach a
//! target, then replay them.
//!
//! Usage:
//!   ricochet boards/classic.txt
//!   ricochet boards/classic.txt --seed 7 --max-moves 12 --delay-ms 0
//!   RUST_LOG=debug ricochet boards/open8.txt --json

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ricochet_core::{
    BoardView, Color, Configuration, DEFAULT_LABELS, Point, Robot, apply_configuration,
    load_board_file, random_robots,
};
use ricochet_solver::{Solver, SolverConfig};

/// Shortest-move solver for sliding-robot puzzles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board file to load
    board: PathBuf,

    /// Longest solution to search for
    #[arg(long, default_value_t = ricochet_solver::DEFAULT_MAX_MOVES)]
    max_moves: usize,

    /// Time budget for the search, in seconds
    #[arg(long, default_value_t = ricochet_solver::DEFAULT_MAX_TIME.as_secs_f64())]
    max_time: f64,

    /// Seed for random robots and targets
    #[arg(long)]
    seed: Option<u64>,

    /// Index of the robot that must reach the target
    #[arg(long)]
    target_robot: Option<usize>,

    /// Index into the board's targets (random if omitted)
    #[arg(long)]
    target: Option<usize>,

    /// Pause between replayed moves, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Print the result as JSON instead of replaying it
    #[arg(long)]
    json: bool,

    /// Never revisit a configuration
    #[arg(long)]
    visited_set: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    log::info!("seed {seed}");

    let file = load_board_file(&args.board)
        .map_err(|e| format!("{}: {e}", args.board.display()))?;
    let board = file.board;

    let from_file = file.robots.is_some();
    let mut robots: Vec<Robot> = match file.robots {
        Some(robots) if !robots.is_empty() => robots,
        _ => random_robots(&board, &DEFAULT_LABELS, &Color::CLASSIC, &mut rng)?,
    };

    let target_robot = match args.target_robot {
        Some(i) => i,
        // File robots list the target robot first.
        None if from_file => 0,
        None => rng.random_range(0..robots.len()),
    };
    let target = pick_target(&board, args.target, &robots, &mut rng)?;

    let config = SolverConfig {
        max_moves: args.max_moves,
        max_time: Duration::try_from_secs_f64(args.max_time)?,
        visited_set: args.visited_set,
    };

    if !args.json {
        println!("{}", BoardView::new(&board, &robots, &[target]));
        println!(
            "Moving {} to {target}, at most {} moves",
            robots
                .get(target_robot)
                .map_or("?", |r| r.label()),
            config.max_moves
        );
    }

    let initial = Configuration::of(&robots);
    let solver = Solver::new(&board, initial, target, target_robot, config)?;
    let stats = solver.stats();

    if args.json {
        let out = serde_json::json!({
            "seed": seed,
            "target": target,
            "target_robot": target_robot,
            "robots": robots,
            "moves": solver.moves(),
            "solution": solver.solution(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Searched for {:.3}s ({} nodes)", stats.elapsed.as_secs_f64(), stats.expanded);
    let Some(path) = solver.solution() else {
        println!("No solution within {} moves", config.max_moves);
        return Ok(());
    };
    println!("Solved in {} moves", path.len() - 1);

    let delay = Duration::from_millis(args.delay_ms);
    for (step, cfg) in path.iter().enumerate().skip(1) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        apply_configuration(&mut robots, cfg);
        println!();
        println!("Move {step}:");
        println!("{}", BoardView::new(&board, &robots, &[target]));
    }
    Ok(())
}

/// The board's target at `index`, or a random one. Boards without targets
/// get a random free cell.
fn pick_target(
    board: &ricochet_core::Board,
    index: Option<usize>,
    robots: &[Robot],
    rng: &mut impl Rng,
) -> Result<Point, String> {
    let targets = board.targets();
    match index {
        Some(i) => targets
            .get(i)
            .copied()
            .ok_or_else(|| format!("target index {i} out of range ({} targets)", targets.len())),
        None if !targets.is_empty() => Ok(targets[rng.random_range(0..targets.len())]),
        None => {
            let free: Vec<Point> = board
                .cells()
                .filter(|p| robots.iter().all(|r| r.position() != *p))
                .collect();
            if free.is_empty() {
                return Err("no free cell for a target".to_string());
            }
            Ok(free[rng.random_range(0..free.len())])
        }
    }
}
