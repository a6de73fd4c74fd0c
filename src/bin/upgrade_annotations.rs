/*
cargo run --bin upgrade_annotations -- annotations.json

cargo run --bin upgrade_annotations -- \
    anno_human_ai/gemini.json \
    -o anno_human_ai/gemini_canonical.json
*/

use std::path::PathBuf;

use anno_bench::{logging, store};
use anyhow::Result;
use clap::Parser;
use log::info;

/// Rewrite an annotation file (legacy string labels, flat human objects) in
/// the canonical {human?, ai?} shape.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    input: PathBuf,

    // Defaults to rewriting the input in place
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("upgrade_annotations")?;

    // strict load: never overwrite a file we could not parse
    let set = store::try_load(&args.input)?;
    let output = args.output.unwrap_or_else(|| args.input.clone());
    store::save(&output, &set)?;

    let with_human = set.iter().filter(|(_, _, r)| r.human.is_some()).count();
    let with_ai = set.iter().filter(|(_, _, r)| r.ai.is_some()).count();
    info!("{} → {}: {} samples", args.input.display(), output.display(), set.len());

    println!(
        "Upgraded {} samples across {} apps ({} human, {} ai) into {}",
        set.len(),
        set.app_count(),
        with_human,
        with_ai,
        output.display()
    );
    Ok(())
}
