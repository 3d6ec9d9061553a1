//! CLI wiring around the SIPP core (`spec.md` §1, deliberately outside the
//! core's scope, but needed to run it end to end).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use sipp::{default_heuristic, map_io, MovementRules, Planner};

#[derive(Parser, Debug)]
#[command(about = "Safe-Interval Path Planning on a 2D grid")]
struct Args {
    /// Path to the map XML file.
    map: PathBuf,

    #[arg(long)]
    allow_diagonal: bool,

    #[arg(long)]
    cut_corners: bool,

    #[arg(long)]
    allow_squeeze: bool,
}

const EXIT_NO_PATH: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;
// INTERNAL_ERROR (spec.md §7.4) surfaces as a panic from a debug_assert!,
// not a matched exit code here; no Result variant carries it.
#[allow(dead_code)]
const EXIT_INTERNAL_ERROR: u8 = 3;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let xml = match fs::read_to_string(&args.map) {
        Ok(xml) => xml,
        Err(err) => {
            eprintln!(
                "INVALID_INPUT: failed to read {}: {err}",
                args.map.display()
            );
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let rules = MovementRules {
        allow_diagonal: args.allow_diagonal,
        cut_corners: args.cut_corners,
        allow_squeeze: args.allow_squeeze,
    };

    let grid = match map_io::parse_map(&xml, rules) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("INVALID_INPUT: {err}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let heuristic = default_heuristic(rules.allow_diagonal);
    let mut planner = Planner::new(grid);

    match planner.solve(heuristic.as_ref()) {
        Ok(solution) => {
            info!(
                "path found: {} steps, arrival {}, expanded {}, generated {}, open_duplicates {}",
                solution.steps.len(),
                solution.steps.last().unwrap().2,
                solution.stats.expanded,
                solution.stats.generated,
                solution.stats.open_duplicates,
            );
            for (i, j, t) in &solution.steps {
                println!("{i} {j} {t}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("NO_PATH: {err}");
            ExitCode::from(EXIT_NO_PATH)
        }
    }
}
