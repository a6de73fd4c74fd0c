//! The benchmark: every sample with at least one positive signal.
//!
//! A sample lands here when some model answered "Yes" or the human judgment is
//! the positive category. Samples that are negative everywhere are never
//! stored, so the benchmark alone cannot tell how many true negatives exist;
//! see [`crate::score::Universe`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::record::{AnnotationSet, SampleKey};
use crate::store;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Models that labelled the sample "Yes".
    pub ai: BTreeSet<String>,
    /// Whether the human judgment is the positive category.
    pub human: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    OnlyAi,
    OnlyHuman,
    Both,
}

impl BenchmarkEntry {
    pub fn agreement(&self) -> Option<Agreement> {
        match (self.human, self.ai.is_empty()) {
            (false, false) => Some(Agreement::OnlyAi),
            (true, true) => Some(Agreement::OnlyHuman),
            (true, false) => Some(Agreement::Both),
            (false, true) => None,
        }
    }
}

/// `app → sample → entry`, serialized as `benchmark_full.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Benchmark {
    apps: BTreeMap<String, BTreeMap<String, BenchmarkEntry>>,
}

impl Benchmark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `(model, merged set)` pairs into one benchmark.
    pub fn build<'a, I>(models: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a AnnotationSet)>,
    {
        let mut benchmark = Self::new();
        for (model, data) in models {
            benchmark.add_model(model, data);
        }
        benchmark
    }

    pub fn add_model(&mut self, model: &str, data: &AnnotationSet) {
        for (app, sample, record) in data.iter() {
            if record.is_ai_yes() {
                self.entry(app, sample).ai.insert(model.to_string());
            }
            if record.is_human_positive() {
                self.entry(app, sample).human = true;
            }
        }
    }

    fn entry(&mut self, app: &str, sample: &str) -> &mut BenchmarkEntry {
        self.apps
            .entry(app.to_string())
            .or_default()
            .entry(sample.to_string())
            .or_default()
    }

    /// Adds an already built entry, e.g. when filtering another benchmark.
    pub fn insert(&mut self, app: &str, sample: &str, entry: BenchmarkEntry) {
        *self.entry(app, sample) = entry;
    }

    pub fn get(&self, app: &str, sample: &str) -> Option<&BenchmarkEntry> {
        self.apps.get(app).and_then(|samples| samples.get(sample))
    }

    pub fn contains(&self, app: &str, sample: &str) -> bool {
        self.get(app, sample).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &BenchmarkEntry)> {
        self.apps.iter().flat_map(|(app, samples)| {
            samples
                .iter()
                .map(move |(sample, entry)| (app.as_str(), sample.as_str(), entry))
        })
    }

    pub fn len(&self) -> usize {
        self.apps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys whose human judgment is positive.
    pub fn ground_truth(&self) -> BTreeSet<SampleKey> {
        self.iter()
            .filter(|(_, _, entry)| entry.human)
            .map(|(app, sample, _)| SampleKey::new(app, sample))
            .collect()
    }

    pub fn stats(&self) -> BenchmarkStats {
        let mut stats = BenchmarkStats::default();
        for (app, sample, entry) in self.iter() {
            let models = || Some(entry.ai.iter().cloned().collect::<Vec<_>>());
            match entry.agreement() {
                Some(Agreement::OnlyAi) => stats.only_ai.push(StatEntry::new(app, sample, models())),
                Some(Agreement::OnlyHuman) => stats.only_human.push(StatEntry::new(app, sample, None)),
                Some(Agreement::Both) => stats.both.push(StatEntry::new(app, sample, models())),
                None => {}
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub app: String,
    pub sample: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}

impl StatEntry {
    fn new(app: &str, sample: &str, models: Option<Vec<String>>) -> Self {
        Self {
            app: app.to_string(),
            sample: sample.to_string(),
            models,
        }
    }
}

/// The three disjoint agreement groups, serialized as `benchmark_stat.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkStats {
    pub only_ai: Vec<StatEntry>,
    pub only_human: Vec<StatEntry>,
    pub both: Vec<StatEntry>,
}

pub fn load_benchmark(path: &Path) -> Result<Benchmark> {
    let value = store::read_json(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("{} is not a benchmark file", path.display()))
}

/// Builds the benchmark from every merged model file and writes the full and
/// stat files.
pub fn run(cfg: &BenchmarkConfig) -> Result<(Benchmark, BenchmarkStats)> {
    let models = store::load_model_dir(&cfg.merged_dir)?;
    info!(
        "building benchmark from {} model file(s) in {}",
        models.len(),
        cfg.merged_dir.display()
    );

    let benchmark = Benchmark::build(models.iter().map(|(m, set)| (m.as_str(), set)));
    let stats = benchmark.stats();

    store::write_json(&cfg.full_path(), &benchmark)?;
    store::write_json(&cfg.stat_path(), &stats)?;
    info!(
        "benchmark: {} entries ({} only ai, {} only human, {} both)",
        benchmark.len(),
        stats.only_ai.len(),
        stats.only_human.len(),
        stats.both.len()
    );
    Ok((benchmark, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_set;
    use serde_json::json;

    fn model(data: serde_json::Value) -> AnnotationSet {
        normalize_set(data)
    }

    #[test]
    fn single_yes_with_empty_human_side() {
        let z = model(json!({"appX": {"sY": {"ai": {"label": "Yes", "reason": "r"}}}}));
        let benchmark = Benchmark::build([("modelZ", &z)]);
        assert_eq!(
            serde_json::to_value(&benchmark).unwrap(),
            json!({"appX": {"sY": {"ai": ["modelZ"], "human": false}}})
        );
    }

    #[test]
    fn negatives_everywhere_are_not_stored() {
        let a = model(json!({"app": {
            "neg": {"human": {"label": "非高成本渲染组件遮挡"}, "ai": {"label": "No"}},
            "pos": {"human": {"label": "高成本渲染组件遮挡"}, "ai": {"label": "No"}}
        }}));
        let b = model(json!({"app": {"neg": {"ai": {"label": "No"}}}}));

        let benchmark = Benchmark::build([("a", &a), ("b", &b)]);
        assert!(!benchmark.contains("app", "neg"));
        assert_eq!(
            benchmark.get("app", "pos"),
            Some(&BenchmarkEntry { ai: BTreeSet::new(), human: true })
        );
    }

    #[test]
    fn models_are_unioned_and_sorted() {
        let qwen = model(json!({"app": {"s": {"ai": {"label": "Yes"}}}}));
        let gemini = model(json!({"app": {"s": {"ai": {"label": "Yes"},
                                                "human": {"label": "高成本渲染组件遮挡"}}}}));
        let llama = model(json!({"app": {"s": {"ai": {"label": "No"}}}}));

        let benchmark = Benchmark::build([("qwen", &qwen), ("gemini", &gemini), ("llama", &llama)]);
        let entry = benchmark.get("app", "s").unwrap();
        assert!(entry.human);
        assert_eq!(entry.ai.iter().collect::<Vec<_>>(), vec!["gemini", "qwen"]);
    }

    #[test]
    fn stats_split_into_disjoint_groups() {
        let m = model(json!({"app": {
            "ai_only": {"ai": {"label": "Yes"}},
            "human_only": {"human": {"label": "高成本渲染组件遮挡"}},
            "both": {"ai": {"label": "Yes"}, "human": {"label": "高成本渲染组件遮挡"}}
        }}));
        let stats = Benchmark::build([("m", &m)]).stats();

        assert_eq!(stats.only_ai.len(), 1);
        assert_eq!(stats.only_ai[0].sample, "ai_only");
        assert_eq!(stats.only_human[0].models, None);
        assert_eq!(stats.both[0].models, Some(vec!["m".to_string()]));

        let value = serde_json::to_value(&stats).unwrap();
        assert!(value["only_human"][0].get("models").is_none());
    }

    #[test]
    fn benchmark_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_full.json");
        let m = model(json!({"app": {"s": {"ai": {"label": "Yes"}}}}));
        let benchmark = Benchmark::build([("m", &m)]);

        store::write_json(&path, &benchmark).unwrap();
        assert_eq!(load_benchmark(&path).unwrap(), benchmark);
    }
}
