//! Human/AI co-annotation pipeline for the UI occlusion benchmark.
//!
//! Raw annotation files → [`normalize`] → [`merge`] (one file per model) →
//! [`benchmark`] → [`score`] and [`partition`]. Each binary under `src/bin`
//! runs one stage.

pub mod benchmark;
pub mod config;
pub mod images;
pub mod logging;
pub mod merge;
pub mod normalize;
pub mod partition;
pub mod record;
pub mod score;
pub mod store;

pub use benchmark::{Benchmark, BenchmarkEntry, BenchmarkStats};
pub use record::{
    AiAnnotation, AiLabel, Annotation, AnnotationRecord, AnnotationSet, HumanAnnotation,
    HumanLabel, Role, SampleKey, NEGATIVE_LABEL, POSITIVE_LABEL,
};
pub use score::{ScoreResult, Universe};
