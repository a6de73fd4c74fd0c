//! Named subsets of the annotations and the benchmark, for manual review.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::benchmark::{load_benchmark, Benchmark};
use crate::config::{ConfirmConfig, PartitionConfig};
use crate::record::AnnotationSet;
use crate::store;

/// Agreement between one model and the human judgments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPartition {
    /// Model "Yes" and human positive.
    pub both: AnnotationSet,
    /// Model "Yes" but the human chose the negative category.
    pub ai_only: AnnotationSet,
    /// Human positive but the model did not say "Yes".
    pub human_only: AnnotationSet,
}

impl ModelPartition {
    pub fn groups(&self) -> [(&'static str, &AnnotationSet); 3] {
        [
            ("both", &self.both),
            ("ai_only", &self.ai_only),
            ("human_only", &self.human_only),
        ]
    }
}

pub fn partition_model(set: &AnnotationSet) -> ModelPartition {
    let mut out = ModelPartition::default();
    for (app, sample, record) in set.iter() {
        let yes = record.is_ai_yes();
        if yes && record.is_human_positive() {
            out.both.insert(app, sample, record.clone());
        }
        // a sample with no human judgment is in neither of these two
        if yes && record.is_human_negative() {
            out.ai_only.insert(app, sample, record.clone());
        }
        if record.is_human_positive() && !yes {
            out.human_only.insert(app, sample, record.clone());
        }
    }
    out
}

/// Entries with at least `min_models` "Yes" votes but a negative human call.
pub fn low_confidence_false(benchmark: &Benchmark, min_models: usize) -> Benchmark {
    let mut out = Benchmark::new();
    for (app, sample, entry) in benchmark.iter() {
        if !entry.human && entry.ai.len() >= min_models {
            out.insert(app, sample, entry.clone());
        }
    }
    out
}

/// Per-app count of "Yes" answers; apps without any are left out.
pub fn yes_counts_by_app(set: &AnnotationSet) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (app, _, record) in set.iter() {
        if record.is_ai_yes() {
            *counts.entry(app.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Shape of one annotation file, for the stat report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSummary {
    pub apps: usize,
    pub samples: usize,
    pub yes_by_app: BTreeMap<String, usize>,
}

pub fn summarize(set: &AnnotationSet) -> FileSummary {
    FileSummary {
        apps: set.app_count(),
        samples: set.len(),
        yes_by_app: yes_counts_by_app(set),
    }
}

/// `(file name, summary or error)` for every JSON file in `dir`.
pub fn summarize_dir(dir: &Path) -> Result<Vec<(String, Result<FileSummary>)>> {
    let mut out = Vec::new();
    for path in store::json_files(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push((name, store::try_load(&path).map(|set| summarize(&set))));
    }
    Ok(out)
}

/// Writes `<output_dir>/<model>/{both,ai_only,human_only}.json` for each
/// model. Models whose merged file cannot be read are reported as `None`.
pub fn run_partition(cfg: &PartitionConfig) -> Result<Vec<(String, Option<ModelPartition>)>> {
    let models = if cfg.models.is_empty() {
        store::json_files(&cfg.merged_dir)?
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect()
    } else {
        cfg.models.clone()
    };

    let mut results = Vec::new();
    for model in models {
        let path = cfg.merged_dir.join(format!("{model}.json"));
        let set = match store::try_load(&path) {
            Ok(set) => set,
            Err(e) => {
                warn!("skipping {model}: {e:#}");
                results.push((model, None));
                continue;
            }
        };

        let partition = partition_model(&set);
        let dir = cfg.output_dir.join(&model);
        for (name, group) in partition.groups() {
            store::save(&dir.join(format!("{name}.json")), group)?;
        }
        info!(
            "{model}: both {}, ai_only {}, human_only {}",
            partition.both.len(),
            partition.ai_only.len(),
            partition.human_only.len()
        );
        results.push((model, Some(partition)));
    }
    Ok(results)
}

/// Filters the benchmark file down to likely false negatives of the human pass.
pub fn run_confirm(cfg: &ConfirmConfig) -> Result<Benchmark> {
    let benchmark = load_benchmark(&cfg.benchmark_path)?;
    let filtered = low_confidence_false(&benchmark, cfg.min_models);
    store::write_json(&cfg.output_path, &filtered)?;
    info!(
        "{} of {} benchmark entries have ≥{} model votes and a negative human call",
        filtered.len(),
        benchmark.len(),
        cfg.min_models
    );
    Ok(filtered)
}
