/*
cargo run --bin merge_ai_human

cargo run --bin merge_ai_human -- \
    --human gt2.json \
    --ai-dir annotations_2 \
    --output-dir anno_human_ai_2 \
    -m llama -m qwen -m openai -m gemini
*/

use std::path::PathBuf;

use anno_bench::{config, config::MergeConfig, logging, merge};
use anyhow::Result;
use clap::Parser;

/// Merge the human judgments with each model's annotations, one file per model.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = config::DEFAULT_HUMAN_PATH)]
    human: PathBuf,

    // Holds annotations_<model>.json
    #[arg(long, default_value = config::DEFAULT_AI_DIR)]
    ai_dir: PathBuf,

    #[arg(short, long, default_value = config::DEFAULT_MERGED_DIR)]
    output_dir: PathBuf,

    // Models to merge; every annotations_*.json in ai-dir when omitted
    #[arg(short, long = "model")]
    models: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = logging::init("merge_ai_human")?;

    let cfg = MergeConfig {
        human_path: args.human,
        ai_dir: args.ai_dir,
        output_dir: args.output_dir,
        models: args.models,
    };
    let report = merge::run(&cfg)?;

    for (model, count, path) in &report.merged {
        println!("✔ {model:<16} {count:>5} samples → {}", path.display());
    }
    for (model, reason) in &report.skipped {
        println!("✘ {model:<16} skipped: {reason}");
    }
    println!(
        "\nMerged {} model(s), skipped {} (log: {})",
        report.merged.len(),
        report.skipped.len(),
        log_path.display()
    );
    Ok(())
}
