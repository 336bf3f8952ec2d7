use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use hashi::{Grid, GridError, Puzzle, Solution, SolverFailure, Strategy, VarisatOracle, Violation};
use log::{info, LevelFilter};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(author, version, about = "Solve Hashiwokakero (bridges) puzzles with a SAT solver", long_about = None)]
struct Args {
    /// The puzzle to solve: one row per line, cells separated by commas, 0 for water and 1 to 8 for islands.
    input: PathBuf,

    /// How to search for a solution: direct, exhaustive, backtracking or best-first.
    /// Everything but direct is only practical for very small puzzles.
    #[arg(short, long, default_value_t = Strategy::Direct)]
    algorithm: Strategy,

    /// Where to write the drawn solution. Nothing is written if no solution is found.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log what the solver is doing.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("malformed puzzle: {0}")]
    Grid(#[from] GridError),
    #[error(transparent)]
    Solver(#[from] SolverFailure),
    #[error("the solver returned an illegal solution: {0}")]
    Illegal(#[from] Violation),
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{} {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn verify(puzzle: &Puzzle, solution: &Solution) -> Result<(), CliError> {
    Ok(solution.check(puzzle)?)
}

fn run(args: Args) -> Result<bool, CliError> {
    let text = fs::read_to_string(&args.input)
        .map_err(|source| CliError::Read { path: args.input.clone(), source })?;
    let puzzle = Puzzle::from(text.parse::<Grid>()?);
    info!("solving {} with {} search", args.input.display(), args.algorithm);

    let encoding = puzzle.compile();
    println!("CNF statistics:");
    println!("{}", encoding.statistics());

    let start = Instant::now();
    let model = args.algorithm.run(&encoding, &VarisatOracle)?;
    let elapsed = start.elapsed();

    let Some(model) = model else {
        println!("No solution found.");
        return Ok(false);
    };

    let solution = Solution::decode(&encoding, &model);
    verify(&puzzle, &solution)?;

    let drawing = puzzle.render(&solution);
    println!();
    println!("{}", drawing);
    println!("Solution found by {} search in {:.3?}.", args.algorithm, elapsed);

    if let Some(path) = args.output {
        fs::write(&path, drawing).map_err(|source| CliError::Write { path, source })?;
    }

    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(args.verbose);

    let result = run(args);
    if let Err(e) = &result {
        eprintln!("error: {}", e);
    }
    ExitCode::from(status(&result))
}

/// 0 when solved, 1 when there is no solution, 2 on any error.
fn status(result: &Result<bool, CliError>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(text: &str) -> Puzzle {
        Puzzle::from(text.parse::<Grid>().unwrap())
    }

    #[test]
    fn illegal_solution_is_an_error() {
        let puzzle = puzzle("2,2");

        let result = verify(&puzzle, &Solution::from(vec![1])).map(|_| true);
        assert!(matches!(result, Err(CliError::Illegal(Violation::WrongCount { .. }))));
        assert_eq!(status(&result), 2);

        assert!(verify(&puzzle, &Solution::from(vec![2])).is_ok());
    }

    #[test]
    fn exit_statuses() {
        assert_eq!(status(&Ok(true)), 0);
        assert_eq!(status(&Ok(false)), 1);
        assert_eq!(status(&Err(CliError::Grid(GridError::Empty))), 2);
    }
}
