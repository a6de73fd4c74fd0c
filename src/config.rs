//! Per-stage settings. The binaries fill these from their command line; the
//! defaults below are the relative paths the tools have always used.

use std::path::PathBuf;

pub const DEFAULT_UI_ANNOTATIONS: &str = "anno_human_ai/gemini.json";
pub const DEFAULT_HUMAN_PATH: &str = "gt2.json";
pub const DEFAULT_AI_DIR: &str = "annotations_2";
pub const DEFAULT_MERGED_DIR: &str = "anno_human_ai_2";
pub const DEFAULT_BENCHMARK_DIR: &str = "Benchmark";
pub const DEFAULT_PARTITION_DIR: &str = "anno_comp_2";
pub const DEFAULT_IMAGE_ROOT: &str = "overlap_visualizations_3_sampled_complete";
pub const DEFAULT_VIS_ROOT: &str = "simple_benchmark_vis";

pub const BENCHMARK_FULL_FILE: &str = "benchmark_full.json";
pub const BENCHMARK_STAT_FILE: &str = "benchmark_stat.json";
pub const BENCHMARK_FALSE_FILE: &str = "benchmark_false.json";
pub const SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// File holding the human judgments.
    pub human_path: PathBuf,
    /// Directory with one `annotations_<model>.json` per model.
    pub ai_dir: PathBuf,
    /// Receives one `<model>.json` per merged model.
    pub output_dir: PathBuf,
    /// Models to merge; empty means every model found in `ai_dir`.
    pub models: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub merged_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl BenchmarkConfig {
    pub fn full_path(&self) -> PathBuf {
        self.output_dir.join(BENCHMARK_FULL_FILE)
    }

    pub fn stat_path(&self) -> PathBuf {
        self.output_dir.join(BENCHMARK_STAT_FILE)
    }
}

/// Where the set of all known samples comes from when counting negatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniverseSource {
    /// Scan `<root>/<app>/<sample>__{before,current,after}*` images.
    Images(PathBuf),
    /// Every key found in any merged per-model file.
    Annotations,
}

#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub benchmark_path: PathBuf,
    pub merged_dir: PathBuf,
    pub universe: UniverseSource,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PartitionConfig {
    pub merged_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Empty means every model in `merged_dir`.
    pub models: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConfirmConfig {
    pub benchmark_path: PathBuf,
    pub output_path: PathBuf,
    /// Minimum number of models that said "Yes".
    pub min_models: usize,
}

#[derive(Debug, Clone)]
pub struct RekeyConfig {
    pub input_path: PathBuf,
    pub vis_root: PathBuf,
    pub output_path: PathBuf,
}
