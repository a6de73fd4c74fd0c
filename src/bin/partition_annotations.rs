/*
cargo run --bin partition_annotations -- -m openai -m gemini -m qwen -m llama
*/

use std::path::PathBuf;

use anno_bench::{config, config::PartitionConfig, logging, partition};
use anyhow::Result;
use clap::Parser;

/// Split each model's merged file into both / ai_only / human_only.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = config::DEFAULT_MERGED_DIR)]
    merged_dir: PathBuf,

    #[arg(short, long, default_value = config::DEFAULT_PARTITION_DIR)]
    output_dir: PathBuf,

    // Every model in merged-dir when omitted
    #[arg(short, long = "model")]
    models: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("partition_annotations")?;

    let cfg = PartitionConfig {
        merged_dir: args.merged_dir,
        output_dir: args.output_dir,
        models: args.models,
    };

    for (model, partition) in partition::run_partition(&cfg)? {
        let Some(p) = partition else {
            println!("Model '{model}': merged file missing or unreadable, skipped");
            println!("{}", "-".repeat(30));
            continue;
        };
        println!(
            "Model '{model}' written to {}",
            cfg.output_dir.join(&model).display()
        );
        for (name, group) in p.groups() {
            println!("  {name:<10} samples: {}", group.len());
        }
        println!("{}", "-".repeat(30));
    }
    Ok(())
}
