//! FastRemap CLI entry point
//!
//! Reads an almanac and prints the lowest final value for each seed mode.

use anyhow::Context;
use clap::Parser;
use fast_remap::core::{parse_almanac_file, RemapGraph, SeedMode, ValueRange};
use std::path::PathBuf;
use std::time::Instant;

fn parse_seed_mode(s: &str) -> Result<SeedMode, String> {
    SeedMode::from_str(s).ok_or_else(|| format!("unknown seed mode '{}', expected points or ranges", s))
}

#[derive(Parser)]
#[command(name = "fast-remap")]
#[command(about = "Push seed ranges through chained interval maps and report the lowest result")]
#[command(version)]
#[command(author = "FastRemap Contributors")]
struct Cli {
    /// Almanac file (plain, .gz or .bz2)
    input: PathBuf,

    /// Seed interpretations to solve, in output order (points, ranges)
    #[arg(
        short = 'm',
        long = "mode",
        value_delimiter = ',',
        default_values = ["points", "ranges"],
        value_parser = parse_seed_mode
    )]
    modes: Vec<SeedMode>,

    /// Number of threads (1 resolves sequentially)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Print parse and solve durations to stderr
    #[arg(long)]
    timed: bool,
}

fn solve(graph: &RemapGraph, seeds: &[ValueRange], threads: usize) -> anyhow::Result<Option<u64>> {
    if threads > 1 {
        Ok(graph.lowest_location_parallel(seeds, threads)?)
    } else {
        Ok(graph.lowest_location(seeds))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    log::info!("Loading almanac: {:?}", cli.input);

    let almanac = parse_almanac_file(&cli.input)
        .with_context(|| format!("Failed to load almanac {:?}", cli.input))?;
    let graph = almanac.graph();

    log::info!(
        "Loaded {} seeds, {} stages, {} rules",
        almanac.seeds.len(),
        graph.stage_count(),
        graph.total_rules()
    );
    if cli.timed {
        eprintln!("Parsed in {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    }

    // Solve every mode before printing so a failure emits nothing
    let mut answers = Vec::new();
    for &mode in &cli.modes {
        let solve_start = Instant::now();
        let seeds = almanac
            .seed_ranges(mode)
            .with_context(|| format!("Invalid seeds for {:?} mode", mode))?;

        let lowest = solve(&graph, &seeds, cli.threads)?
            .with_context(|| format!("No non-empty seed range in {:?} mode", mode))?;

        if cli.timed {
            eprintln!(
                "{:?} mode solved in {:.3}ms",
                mode,
                solve_start.elapsed().as_secs_f64() * 1000.0
            );
        }
        answers.push(lowest);
    }

    for answer in answers {
        println!("{}", answer);
    }

    if cli.timed {
        eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    }
    Ok(())
}
