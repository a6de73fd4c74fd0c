use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_DIR: &str = "logs";

/// Info and up go to `logs/<tool>_<timestamp>.log`, warnings also to stderr.
/// Returns the log file path.
pub fn init(tool: &str) -> Result<PathBuf> {
    fs::create_dir_all(LOG_DIR).context("could not create logs/ directory")?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = PathBuf::from(LOG_DIR).join(format!("{tool}_{timestamp}.log"));
    let file = fs::File::create(&log_path)
        .with_context(|| format!("could not create {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, ConfigBuilder::new().build(), file),
    ])
    .context("failed to initialise logger")?;

    Ok(log_path)
}
