use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sokotrim::direction::{Direction, format_moves, parse_moves};
use sokotrim::error::SokoError;
use sokotrim::level::{Level, MoveOutcome};
use sokotrim::levels::{LevelError, LevelRecord, Levels, read_records, write_records};
use sokotrim::optimizer::{Optimized, Optimizer};

struct LevelStats {
    before: usize,
    after: usize,
    anomalies: usize,
    elapsed_ms: u128,
}

struct OptimizeOpts {
    merge: bool,
    verify: bool,
}

fn print_solution(level: &Level, solution: &[Direction]) {
    println!("\nStarting position:\n{}", level);
    let mut level = level.clone();
    let total = solution.len();
    let mut pushes = 0;
    for (count, &dir) in solution.iter().enumerate() {
        let before = level.player();
        match level.apply_move(dir) {
            Ok(result) if result.outcome == MoveOutcome::Pushed => {
                pushes += 1;
                println!(
                    "Push #{} from {} {} ({}/{}):\n{}",
                    pushes,
                    before,
                    dir,
                    count + 1,
                    total,
                    level
                );
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error replaying solution: {}", e);
                return;
            }
        }
    }
}

fn optimize_level(
    title: &str,
    level: &Level,
    solution: &str,
    opts: &OptimizeOpts,
) -> Result<(Optimized, LevelStats), LevelError> {
    let record_error = |source: SokoError| LevelError::Record {
        title: title.to_string(),
        source,
    };

    let moves = parse_moves(solution).map_err(record_error)?;
    let mut optimizer = Optimizer::new(level.clone(), opts.merge);

    let start = Instant::now();
    let optimized = optimizer.optimize(&moves).map_err(record_error)?;
    let elapsed_ms = start.elapsed().as_millis();

    if opts.verify {
        let solves = optimizer.verify(&optimized.moves).map_err(record_error)?;
        if !solves || optimized.moves.len() > moves.len() {
            eprintln!(
                "Warning: {}: optimized solution does not verify (solves: {}, moves: {} -> {})",
                title,
                solves,
                moves.len(),
                optimized.moves.len()
            );
        }
    }

    println!(
        "level: {:<24}  moves: {:<5} -> {:<5}  segments: {:<4} -> {:<4}  anomalies: {}  elapsed: {} ms",
        title,
        moves.len(),
        optimized.moves.len(),
        optimized.segments,
        optimized.merged_segments,
        optimized.anomalies,
        elapsed_ms
    );

    let stats = LevelStats {
        before: moves.len(),
        after: optimized.moves.len(),
        anomalies: optimized.anomalies,
        elapsed_ms,
    };
    Ok((optimized, stats))
}

fn run_batch(input: &Path, output: &Path, opts: &OptimizeOpts) -> Result<(), LevelError> {
    let records = read_records(input)?;
    info!("optimizing {} records from {}", records.len(), input.display());

    let mut optimized_records = Vec::with_capacity(records.len());
    let mut total_before = 0;
    let mut total_after = 0;
    let mut total_anomalies = 0;
    let mut total_time_ms = 0;

    for record in &records {
        let level = Level::from_text(&record.definition).map_err(|source| LevelError::Record {
            title: record.title.clone(),
            source,
        })?;
        let (optimized, stats) = optimize_level(&record.title, &level, &record.solution, opts)?;

        optimized_records.push(LevelRecord {
            solution: format_moves(&optimized.moves),
            ..record.clone()
        });
        total_before += stats.before;
        total_after += stats.after;
        total_anomalies += stats.anomalies;
        total_time_ms += stats.elapsed_ms;
    }

    write_records(output, &optimized_records)?;

    // Print summary statistics if multiple levels were optimized
    if records.len() > 1 {
        println!("---");
        println!(
            "levels: {:<24}  moves: {:<5} -> {:<5}  anomalies: {}  elapsed: {} ms",
            records.len(),
            total_before,
            total_after,
            total_anomalies,
            total_time_ms
        );
    }
    info!("wrote {}", output.display());
    Ok(())
}

#[derive(Subcommand)]
enum Command {
    /// Optimize every record of a JSON batch file
    Batch {
        /// JSON array of {title, definition, solution} records
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the records with optimized solutions
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Optimize a solution for one level of an XSB file
    Level {
        /// Path to the levels file (XSB format)
        #[arg(value_name = "FILE")]
        levels_file: PathBuf,

        /// Level number (1-indexed)
        #[arg(value_name = "LEVEL")]
        level: usize,

        /// Solution to optimize, using the letters u, r, d and l
        #[arg(value_name = "SOLUTION")]
        solution: String,

        /// Print the board after each push of the optimized solution
        #[arg(short, long)]
        print_solution: bool,
    },
}

#[derive(Parser)]
#[command(name = "sokotrim")]
#[command(about = "Shortens known Sokoban solutions", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Only replace walks between pushes, without merging segments
    #[arg(long, global = true, default_value = "false")]
    no_merge: bool,

    /// Replay each optimized solution and warn if it does not solve the level
    #[arg(long, global = true, default_value = "false")]
    verify: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "sokotrim=info",
        1 => "sokotrim=debug",
        _ => "sokotrim=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let opts = OptimizeOpts {
        merge: !args.no_merge,
        verify: args.verify,
    };

    match args.command {
        Command::Batch { input, output } => {
            if let Err(e) = run_batch(&input, &output, &opts) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Level {
            levels_file,
            level,
            solution,
            print_solution: print,
        } => {
            // Load levels from file
            let levels = match Levels::from_file(&levels_file) {
                Ok(levels) => levels,
                Err(e) => {
                    eprintln!("Error loading levels: {}", e);
                    std::process::exit(1);
                }
            };

            if level == 0 {
                eprintln!("Error: level numbers must be at least 1");
                std::process::exit(1);
            }

            let Some(named) = levels.get(level - 1) else {
                eprintln!(
                    "Error: level {} not found (file contains {} levels)",
                    level,
                    levels.len()
                );
                std::process::exit(1);
            };

            match optimize_level(&named.title, &named.level, &solution, &opts) {
                Ok((optimized, _)) => {
                    println!("{}", format_moves(&optimized.moves));
                    if print {
                        print_solution(&named.level, &optimized.moves);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
