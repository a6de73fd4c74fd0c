/*
cargo run --bin confirm_benchmark

cargo run --bin confirm_benchmark -- --min-models 3
*/

use std::path::PathBuf;

use anno_bench::{config, config::ConfirmConfig, logging, partition};
use anyhow::Result;
use clap::Parser;

/// Collect benchmark entries that several models flagged but the human did not.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value_t = format!("{}/{}", config::DEFAULT_BENCHMARK_DIR, config::BENCHMARK_FULL_FILE))]
    benchmark: String,

    #[arg(short, long, default_value_t = format!("{}/{}", config::DEFAULT_BENCHMARK_DIR, config::BENCHMARK_FALSE_FILE))]
    output: String,

    #[arg(long, default_value_t = 2)]
    min_models: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("confirm_benchmark")?;

    let cfg = ConfirmConfig {
        benchmark_path: PathBuf::from(args.benchmark),
        output_path: PathBuf::from(args.output),
        min_models: args.min_models,
    };
    let filtered = partition::run_confirm(&cfg)?;

    println!("Processed {}", cfg.benchmark_path.display());
    println!(
        "{} sample(s) with ≥{} model votes and a negative human call",
        filtered.len(),
        cfg.min_models
    );
    println!("Written to {}", cfg.output_path.display());
    Ok(())
}
