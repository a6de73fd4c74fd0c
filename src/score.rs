//! Scoring one model's "Yes" answers against the human ground truth.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::benchmark::{load_benchmark, Benchmark};
use crate::config::{ScoreConfig, UniverseSource};
use crate::images::scan_image_samples;
use crate::record::{AnnotationSet, SampleKey};
use crate::store;

/// All known samples; negatives are counted against this set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe(BTreeSet<SampleKey>);

impl Universe {
    pub fn from_keys(keys: impl IntoIterator<Item = SampleKey>) -> Self {
        Self(keys.into_iter().collect())
    }

    pub fn from_images(root: &Path) -> Result<Self> {
        Ok(Self(scan_image_samples(root)?))
    }

    pub fn from_annotations<'a>(sets: impl IntoIterator<Item = &'a AnnotationSet>) -> Self {
        Self(sets.into_iter().flat_map(AnnotationSet::keys).collect())
    }

    pub fn contains(&self, key: &SampleKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub false_positive_rate: f64,
    /// Samples the model called "Yes".
    pub predict_yes: usize,
    /// Universe size, `P + N`.
    pub total: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ScoreResult {
    /// Derives every ratio from the four counts. Zero denominators give 0.
    pub fn from_counts(tp: usize, fp: usize, fn_: usize, tn: usize) -> Self {
        let positives = tp + fn_;
        let negatives = fp + tn;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, positives);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            tp,
            fp,
            fn_,
            tn,
            accuracy: ratio(tp + tn, positives + negatives),
            precision,
            recall,
            f1,
            false_positive_rate: ratio(fp, negatives),
            predict_yes: tp + fp,
            total: positives + negatives,
        }
    }

    pub fn positives(&self) -> usize {
        self.tp + self.fn_
    }

    pub fn negatives(&self) -> usize {
        self.fp + self.tn
    }
}

/// Keys the model labelled "Yes".
pub fn predictions(set: &AnnotationSet) -> BTreeSet<SampleKey> {
    set.iter()
        .filter(|(_, _, record)| record.is_ai_yes())
        .map(|(app, sample, _)| SampleKey::new(app, sample))
        .collect()
}

fn within(keys: BTreeSet<SampleKey>, universe: &Universe, what: &str) -> BTreeSet<SampleKey> {
    let total = keys.len();
    let kept: BTreeSet<_> = keys.into_iter().filter(|k| universe.contains(k)).collect();
    if kept.len() < total {
        warn!("{} {what} key(s) outside the universe ignored", total - kept.len());
    }
    kept
}

/// Confusion counts and ratios for one model. Ground truth and predictions
/// are restricted to the universe first, so `P + N` is the universe size.
pub fn score(benchmark: &Benchmark, model: &AnnotationSet, universe: &Universe) -> ScoreResult {
    let truth = within(benchmark.ground_truth(), universe, "ground-truth");
    let predicted = within(predictions(model), universe, "prediction");

    let tp = truth.intersection(&predicted).count();
    let fp = predicted.difference(&truth).count();
    let fn_ = truth.difference(&predicted).count();
    let tn = universe.len() - truth.union(&predicted).count();

    ScoreResult::from_counts(tp, fp, fn_, tn)
}

/// Scores every merged model file and writes the results.
pub fn run(cfg: &ScoreConfig) -> Result<BTreeMap<String, ScoreResult>> {
    let benchmark = load_benchmark(&cfg.benchmark_path)?;
    let models = store::load_model_dir(&cfg.merged_dir)?;

    let universe = match &cfg.universe {
        UniverseSource::Images(root) => Universe::from_images(root)?,
        UniverseSource::Annotations => Universe::from_annotations(models.iter().map(|(_, s)| s)),
    };
    info!(
        "scoring {} model(s) against {} benchmark entries, universe of {}",
        models.len(),
        benchmark.len(),
        universe.len()
    );

    let results: BTreeMap<String, ScoreResult> = models
        .iter()
        .map(|(model, set)| (model.clone(), score(&benchmark, set, &universe)))
        .collect();

    store::write_json(&cfg.output_path, &results)?;
    Ok(results)
}
