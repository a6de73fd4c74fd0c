/*
cargo run --bin stat_annotations

cargo run --bin stat_annotations -- anno_human_ai_2
*/

use std::path::PathBuf;

use anno_bench::{config, logging, partition};
use anyhow::Result;
use clap::Parser;
use log::error;

/// Count apps, samples and "Yes" answers in every annotation file of a directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(default_value = config::DEFAULT_AI_DIR)]
    directory: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("stat_annotations")?;

    println!("JSON files in {}:", args.directory.display());
    println!("{:<36} {:>5} {:>8} {:>5}", "file", "apps", "samples", "yes");
    println!("{:-<36} {:->5} {:->8} {:->5}", "", "", "", "");

    let summaries = partition::summarize_dir(&args.directory)?;
    for (file, summary) in &summaries {
        match summary {
            Ok(s) => println!(
                "{:<36} {:>5} {:>8} {:>5}",
                file,
                s.apps,
                s.samples,
                s.yes_by_app.values().sum::<usize>()
            ),
            Err(e) => {
                error!("{file}: {e:#}");
                println!("{file:<36} error: {e:#}");
            }
        }
    }

    println!("\n{:<36} {:<36} {:>5}", "app", "file", "yes");
    println!("{:-<36} {:-<36} {:->5}", "", "", "");
    for (file, summary) in &summaries {
        let Ok(s) = summary else { continue };
        for (app, yes) in &s.yes_by_app {
            println!("{app:<36} {file:<36} {yes:>5}");
        }
    }
    Ok(())
}
