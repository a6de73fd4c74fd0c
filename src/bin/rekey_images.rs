/*
cargo run --bin rekey_images -- \
    anno_human_ai/gemini.json \
    -o anno_human_ai_trans/annotations_gemini.json
*/

use std::path::PathBuf;

use anno_bench::{config, config::RekeyConfig, images, logging};
use anyhow::Result;
use clap::Parser;

/// Re-key a merged file from sample ids to the screenCap_<n>.png names of the
/// benchmark visualization images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    input: PathBuf,

    #[arg(long, default_value = config::DEFAULT_VIS_ROOT)]
    vis_root: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("rekey_images")?;

    let cfg = RekeyConfig {
        input_path: args.input,
        vis_root: args.vis_root,
        output_path: args.output,
    };
    let report = images::run_rekey(&cfg)?;

    println!(
        "Re-keyed {} sample(s), dropped {} without a visualization image → {}",
        report.kept,
        report.dropped,
        cfg.output_path.display()
    );
    Ok(())
}
