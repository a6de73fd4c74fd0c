/*
cargo run --bin make_benchmark

cargo run --bin make_benchmark -- \
    --merged-dir anno_human_ai_2 \
    --output-dir Benchmark
*/

use std::path::PathBuf;

use anno_bench::{benchmark, config, config::BenchmarkConfig, logging};
use anyhow::Result;
use clap::Parser;

/// Build the benchmark from the merged per-model files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = config::DEFAULT_MERGED_DIR)]
    merged_dir: PathBuf,

    #[arg(short, long, default_value = config::DEFAULT_BENCHMARK_DIR)]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("make_benchmark")?;

    let cfg = BenchmarkConfig {
        merged_dir: args.merged_dir,
        output_dir: args.output_dir,
    };
    let (benchmark, stats) = benchmark::run(&cfg)?;

    println!(
        "Wrote {} and {}",
        cfg.stat_path().display(),
        cfg.full_path().display()
    );
    println!("Benchmark entries        : {}", benchmark.len());
    println!("Only flagged by a model  : {}", stats.only_ai.len());
    println!("Only flagged by human    : {}", stats.only_human.len());
    println!("Flagged by both          : {}", stats.both.len());
    Ok(())
}
