/*
cargo run --bin annotate -- \
    --file anno_human_ai/gemini.json \
    com.example.video sample_01 high-cost-occluded
*/

use std::path::PathBuf;

use anno_bench::{config, logging, store, HumanAnnotation, HumanLabel, Role};
use anyhow::Result;
use clap::Parser;
use log::info;

/// Record one human judgment, the same way the annotation UI saves it.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Annotation file to update (created if missing)
    #[arg(short, long, default_value = config::DEFAULT_UI_ANNOTATIONS)]
    file: PathBuf,

    app: String,

    sample: String,

    /// 高成本渲染组件遮挡 / 非高成本渲染组件遮挡, or high-cost-occluded / non-high-cost-occlusion
    label: HumanLabel,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("annotate")?;

    // last writer wins: a concurrent save to the same file is overwritten
    let mut annotations = store::load(&args.file);
    annotations.upsert(
        &args.app,
        &args.sample,
        Role::Human,
        HumanAnnotation::new(args.label).into(),
    );
    store::save(&args.file, &annotations)?;

    info!("{}/{} ← {}", args.app, args.sample, args.label);
    println!(
        "Saved {}/{} = {} to {}",
        args.app,
        args.sample,
        args.label,
        args.file.display()
    );
    Ok(())
}
