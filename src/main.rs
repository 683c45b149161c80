//! CLI entry point for the puzzle solvers.
//!
//! Usage:
//!   puzzle-solver burrow <diagram.txt> [options]
//!   puzzle-solver grid <weights.txt> [options]
//!   puzzle-solver caves <edges.txt> [options]
//!
//! Each subcommand reads its puzzle input from a file (or stdin with
//! --stdin) and prints a JSON result. Exit code 0 means a solution was
//! found; 1 means no solution or a bad input.

mod burrow;
mod caves;
mod grid;
mod pruning;
mod routes;
mod solver;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use burrow::Burrow;
use caves::CaveSystem;
use grid::WeightGrid;
use solver::{solve, SolverConfig, SolverResult};

#[derive(Parser)]
#[command(name = "puzzle-solver")]
#[command(about = "Search solvers for burrow-sorting, grid-path, and cave-route puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the minimum energy to sort a burrow diagram
    Burrow {
        /// Path to burrow diagram (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the diagram from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Unfold the diagram with the two extra token rows
        #[arg(long)]
        unfold: bool,

        /// Maximum search time in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Maximum branch advancement steps
        #[arg(long, default_value = "10000000")]
        max_branch_steps: usize,

        /// Disable the seen-placement dedup index
        #[arg(long)]
        no_dedup: bool,
    },

    /// Find the cheapest path across a weighted digit grid
    Grid {
        /// Path to digit-grid file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the grid from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Tile the grid this many times in each direction
        #[arg(long, default_value = "1")]
        tile: usize,
    },

    /// Enumerate every route through a cave network
    Caves {
        /// Path to edge-list file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the edge list from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Allow a single small cave to be visited twice per route
        #[arg(long)]
        allow_revisit: bool,

        /// Include the route strings in the output
        #[arg(long)]
        list_routes: bool,
    },
}

/// Output format for the burrow solver
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BurrowOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    best_energy: Option<u32>,
    moves: Vec<MoveOutput>,
    branches_run: usize,
    branch_steps: usize,
    states_recorded: usize,
    search_exhausted: bool,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveOutput {
    token: char,
    to: (i32, i32),
    energy: u32,
}

/// Output format for the grid search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GridOutput {
    total_cost: u32,
    path: Vec<(usize, usize)>,
}

/// Output format for the cave enumeration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CavesOutput {
    route_count: usize,
    dead_end_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    routes: Option<Vec<String>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Burrow {
            file,
            stdin,
            unfold,
            timeout,
            max_branch_steps,
            no_dedup,
        } => {
            let Some(input) = read_input(file, stdin) else {
                return ExitCode::FAILURE;
            };
            let lines: Vec<&str> = input.lines().collect();
            let parsed = if unfold {
                Burrow::parse_unfolded(&lines)
            } else {
                Burrow::parse(&lines)
            };
            let burrow = match parsed {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error parsing burrow diagram: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let config = SolverConfig {
                timeout: Duration::from_secs(timeout),
                max_branch_steps,
                dedup: !no_dedup,
            };
            let result = solve(&burrow, &config);
            let output = format_burrow_result(&burrow, &result);
            print_json(&output);
            exit_for(result.best_energy.is_some())
        }

        Commands::Grid { file, stdin, tile } => {
            let Some(input) = read_input(file, stdin) else {
                return ExitCode::FAILURE;
            };
            let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
            let grid = match WeightGrid::parse(&lines) {
                Ok(g) if tile > 1 => g.tiled(tile, tile),
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Error parsing weight grid: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let goal = (grid.columns() - 1, grid.rows() - 1);
            match grid.shortest_path((0, 0), goal) {
                Some(result) => {
                    print_json(&GridOutput {
                        total_cost: result.total_cost,
                        path: result.path,
                    });
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("Error: no path to the far corner");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Caves {
            file,
            stdin,
            allow_revisit,
            list_routes,
        } => {
            let Some(input) = read_input(file, stdin) else {
                return ExitCode::FAILURE;
            };
            let lines: Vec<&str> = input.lines().collect();
            let caves = match CaveSystem::parse(&lines) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error parsing cave edges: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let routes = caves.enumerate_routes(allow_revisit);
            let output = CavesOutput {
                route_count: routes.completed.len(),
                dead_end_count: routes.dead_ends.len(),
                routes: list_routes.then(|| {
                    routes
                        .completed
                        .iter()
                        .map(|r| caves.route_string(r))
                        .collect()
                }),
            };
            print_json(&output);
            exit_for(!routes.completed.is_empty())
        }
    }
}

/// Read puzzle input from the file argument or stdin.
fn read_input(file: Option<PathBuf>, stdin: bool) -> Option<String> {
    if stdin {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading stdin: {e}");
            return None;
        }
        Some(buffer)
    } else if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                eprintln!("Error reading file {path:?}: {e}");
                None
            }
        }
    } else {
        eprintln!("Error: Must provide either a file path or --stdin");
        None
    }
}

fn format_burrow_result(burrow: &Burrow, result: &SolverResult) -> BurrowOutput {
    BurrowOutput {
        best_energy: result.best_energy,
        moves: result
            .best_moves
            .iter()
            .map(|mv| {
                let dest = burrow.space(mv.dest());
                MoveOutput {
                    token: burrow.token_category(mv.token).letter(),
                    to: (dest.x, dest.y),
                    energy: mv.energy,
                }
            })
            .collect(),
        branches_run: result.branches_run,
        branch_steps: result.branch_steps,
        states_recorded: result.states_recorded,
        search_exhausted: result.search_exhausted,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

fn print_json<T: Serialize>(output: &T) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing output: {e}"),
    }
}

fn exit_for(solved: bool) -> ExitCode {
    if solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
