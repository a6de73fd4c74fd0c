//! Combining the human judgments with each model's judgments.
//!
//! The human file contributes only its `human` role and a model file only its
//! `ai` role, so a merged record never has competing values for one role.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::config::MergeConfig;
use crate::record::{AnnotationRecord, AnnotationSet, Role};
use crate::store;

const AI_FILE_PREFIX: &str = "annotations_";

/// Copy of `set` keeping only `role`; records without it are left out.
pub fn extract_role(set: &AnnotationSet, role: Role) -> AnnotationSet {
    let mut out = AnnotationSet::new();
    for (app, sample, record) in set.iter() {
        if let Some(value) = record.role(role) {
            out.upsert(app, sample, role, value.clone());
        }
    }
    out
}

/// Union over the keys of both inputs, taking `human` from the first and
/// `ai` from the second.
pub fn merge(human: &AnnotationSet, ai: &AnnotationSet) -> AnnotationSet {
    let mut merged = AnnotationSet::new();
    for key in human.keys().union(&ai.keys()) {
        let record = AnnotationRecord {
            human: human
                .get(&key.app, &key.sample)
                .and_then(|r| r.human.clone()),
            ai: ai.get(&key.app, &key.sample).and_then(|r| r.ai.clone()),
        };
        merged.insert(&key.app, &key.sample, record);
    }
    merged
}

pub fn ai_file_name(model: &str) -> String {
    format!("{AI_FILE_PREFIX}{model}.json")
}

/// Models with an `annotations_<model>.json` file in `ai_dir`, sorted.
pub fn discover_models(ai_dir: &Path) -> Result<Vec<String>> {
    let mut models = Vec::new();
    for path in store::json_files(ai_dir)? {
        let model = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.strip_prefix(AI_FILE_PREFIX));
        if let Some(model) = model.filter(|m| !m.is_empty()) {
            models.push(model.to_string());
        }
    }
    Ok(models)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeReport {
    /// `(model, samples written, output file)`
    pub merged: Vec<(String, usize, PathBuf)>,
    /// `(model, reason)`
    pub skipped: Vec<(String, String)>,
}

/// Merges one model against the already extracted human set and writes
/// `<output_dir>/<model>.json`.
pub fn merge_model(cfg: &MergeConfig, model: &str, human: &AnnotationSet) -> Result<(usize, PathBuf)> {
    let ai_path = cfg.ai_dir.join(ai_file_name(model));
    let ai = extract_role(&store::try_load(&ai_path)?, Role::Ai);
    let merged = merge(human, &ai);

    let out_path = cfg.output_dir.join(format!("{model}.json"));
    store::save(&out_path, &merged)?;
    info!(
        "{model}: {} human + {} ai → {} merged samples in {}",
        human.len(),
        ai.len(),
        merged.len(),
        out_path.display()
    );
    Ok((merged.len(), out_path))
}

/// Runs the merge for every configured model. A model whose file is missing or
/// malformed is skipped; the others still run.
pub fn run(cfg: &MergeConfig) -> Result<MergeReport> {
    let mut report = MergeReport::default();

    let models = if cfg.models.is_empty() {
        discover_models(&cfg.ai_dir).unwrap_or_else(|e| {
            warn!("no models discovered: {e:#}");
            Vec::new()
        })
    } else {
        cfg.models.clone()
    };

    let human = match store::try_load(&cfg.human_path) {
        Ok(set) => extract_role(&set, Role::Human),
        Err(e) => {
            error!("human annotations unavailable: {e:#}");
            let reason = format!("human annotations unavailable: {e:#}");
            report.skipped = models.into_iter().map(|m| (m, reason.clone())).collect();
            return Ok(report);
        }
    };
    info!(
        "loaded {} human annotations from {}",
        human.len(),
        cfg.human_path.display()
    );

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;

    let bar = ProgressBar::new(models.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )?);

    for model in models {
        bar.set_message(model.clone());
        match merge_model(cfg, &model, &human) {
            Ok((count, path)) => report.merged.push((model, count, path)),
            Err(e) => {
                warn!("skipping {model}: {e:#}");
                report.skipped.push((model, format!("{e:#}")));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(report)
}
