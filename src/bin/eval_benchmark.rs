/*
cargo run --bin eval_benchmark

cargo run --bin eval_benchmark -- --universe annotations
*/

use std::path::PathBuf;

use anno_bench::{
    config::{self, ScoreConfig, UniverseSource},
    logging, score,
};
use anyhow::Result;
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UniverseArg {
    /// Scan the screenshot directory
    Images,
    /// Every sample found in the merged files
    Annotations,
}

/// Score every model against the benchmark.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value_t = format!("{}/{}", config::DEFAULT_BENCHMARK_DIR, config::BENCHMARK_FULL_FILE))]
    benchmark: String,

    #[arg(long, default_value = config::DEFAULT_MERGED_DIR)]
    merged_dir: PathBuf,

    // Where negatives are counted from
    #[arg(long, value_enum, default_value_t = UniverseArg::Images)]
    universe: UniverseArg,

    #[arg(long, default_value = config::DEFAULT_IMAGE_ROOT)]
    image_root: PathBuf,

    #[arg(short, long, default_value_t = format!("{}/{}", config::DEFAULT_BENCHMARK_DIR, config::SCORES_FILE))]
    output: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("eval_benchmark")?;

    let cfg = ScoreConfig {
        benchmark_path: PathBuf::from(args.benchmark),
        merged_dir: args.merged_dir,
        universe: match args.universe {
            UniverseArg::Images => UniverseSource::Images(args.image_root),
            UniverseArg::Annotations => UniverseSource::Annotations,
        },
        output_path: PathBuf::from(args.output),
    };
    let results = score::run(&cfg)?;

    for (model, r) in &results {
        println!("\nModel: {model}");
        println!("  Samples            : {}", r.total);
        println!("  TP (hit)           : {}", r.tp);
        println!("  FP (false alarm)   : {}", r.fp);
        println!("  FN (miss)          : {}", r.fn_);
        println!("  TN                 : {}", r.tn);
        println!("  Predicted Yes      : {}", r.predict_yes);
        println!("  Accuracy           : {:.4}", r.accuracy);
        println!("  Precision          : {:.4}", r.precision);
        println!("  Recall             : {:.4}", r.recall);
        println!("  F1                 : {:.4}", r.f1);
        println!("  False positive rate: {:.4}", r.false_positive_rate);
    }
    println!("\nScores written to {}", cfg.output_path.display());
    Ok(())
}
