//! End-to-end run of the batch stages against a temporary working tree.

use std::fs;
use std::path::Path;

use anno_bench::config::{
    BenchmarkConfig, ConfirmConfig, MergeConfig, PartitionConfig, ScoreConfig, UniverseSource,
};
use anno_bench::{benchmark, merge, partition, score, store, POSITIVE_LABEL};
use serde_json::{json, Value};

fn write(path: &Path, value: Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn ai(label: &str, model: &str) -> Value {
    json!({"ai": {
        "label": label,
        "reason": "reason",
        "solution": "solution",
        "annotator": "AI",
        "model_used": model,
        "annotation_timestamp": "2025-06-01 10:00:00"
    }})
}

/// Human file in three generations of shape plus two model files, one good
/// and one broken.
fn seed(root: &Path) {
    write(
        &root.join("gt2.json"),
        json!({
            "video": {
                "s1": POSITIVE_LABEL,
                "s2": {"human": {"label": "非高成本渲染组件遮挡", "annotator": "Human"}},
                "s3": {"human": POSITIVE_LABEL, "ai": {"label": "No"}}
            },
            "maps": {
                "s1": {"label_problem_exists": true}
            }
        }),
    );
    write(
        &root.join("annotations_2/annotations_qwen.json"),
        json!({
            "video": {"s1": ai("Yes", "qwen"), "s2": ai("Yes", "qwen"), "s4": ai("No", "qwen")},
            "maps": {"s1": ai("No", "qwen")}
        }),
    );
    write(
        &root.join("annotations_2/annotations_llama.json"),
        json!({"video": {"s2": ai("Yes", "llama"), "s5": ai("Yes", "llama")}}),
    );
    fs::write(root.join("annotations_2/annotations_broken.json"), "{ nope").unwrap();
}

fn merge_cfg(root: &Path, models: &[&str]) -> MergeConfig {
    MergeConfig {
        human_path: root.join("gt2.json"),
        ai_dir: root.join("annotations_2"),
        output_dir: root.join("anno_human_ai_2"),
        models: models.iter().map(|m| m.to_string()).collect(),
    }
}

#[test]
fn merge_skips_broken_and_missing_models() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let report = merge::run(&merge_cfg(dir.path(), &["qwen", "broken", "absent", "llama"])).unwrap();

    let merged: Vec<_> = report.merged.iter().map(|(m, _, _)| m.as_str()).collect();
    let skipped: Vec<_> = report.skipped.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(merged, vec!["qwen", "llama"]);
    assert_eq!(skipped, vec!["broken", "absent"]);

    let qwen = read(&dir.path().join("anno_human_ai_2/qwen.json"));
    // human side comes only from gt2.json, ai side only from the model file
    assert_eq!(
        qwen["video"]["s3"],
        json!({"human": {"label": POSITIVE_LABEL, "annotator": "Human"}})
    );
    assert_eq!(qwen["video"]["s1"]["ai"]["label"], json!("Yes"));
    assert_eq!(qwen["video"]["s1"]["human"]["label"], json!(POSITIVE_LABEL));
    assert_eq!(qwen["maps"]["s1"]["human"], json!({"label_problem_exists": true}));
    assert!(qwen["video"]["s4"].get("human").is_none());
}

#[test]
fn merge_without_human_file_skips_every_model() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    fs::remove_file(dir.path().join("gt2.json")).unwrap();

    let report = merge::run(&merge_cfg(dir.path(), &[])).unwrap();
    assert!(report.merged.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert!(!dir.path().join("anno_human_ai_2/qwen.json").exists());
}

#[test]
fn full_pipeline_produces_benchmark_and_scores() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    seed(root);

    let report = merge::run(&merge_cfg(root, &[])).unwrap();
    assert_eq!(report.merged.len(), 2);

    let bench_cfg = BenchmarkConfig {
        merged_dir: root.join("anno_human_ai_2"),
        output_dir: root.join("Benchmark"),
    };
    let (bench, stats) = benchmark::run(&bench_cfg).unwrap();

    assert_eq!(
        read(&bench_cfg.full_path()),
        json!({"video": {
            "s1": {"ai": ["qwen"], "human": true},
            "s2": {"ai": ["llama", "qwen"], "human": false},
            "s3": {"ai": [], "human": true},
            "s5": {"ai": ["llama"], "human": false}
        }})
    );
    assert!(!bench.contains("video", "s4"));
    assert_eq!(stats.both.len(), 1);
    assert_eq!(stats.only_human.len(), 1);
    assert_eq!(stats.only_ai.len(), 2);
    assert_eq!(read(&bench_cfg.stat_path())["both"][0]["models"], json!(["qwen"]));

    // images: video s1..s6, maps s1
    let images = root.join("images");
    for sample in ["s1", "s2", "s3", "s4", "s5", "s6"] {
        fs::create_dir_all(images.join("video")).unwrap();
        fs::write(images.join("video").join(format!("{sample}__current.png")), b"").unwrap();
    }
    fs::create_dir_all(images.join("maps")).unwrap();
    fs::write(images.join("maps/s1__before.png"), b"").unwrap();

    let score_cfg = ScoreConfig {
        benchmark_path: bench_cfg.full_path(),
        merged_dir: root.join("anno_human_ai_2"),
        universe: UniverseSource::Images(images),
        output_path: root.join("Benchmark/scores.json"),
    };
    let results = score::run(&score_cfg).unwrap();

    let qwen = &results["qwen"];
    assert_eq!((qwen.tp, qwen.fp, qwen.fn_, qwen.tn), (1, 1, 1, 4));
    assert_eq!(qwen.total, 7);
    let llama = &results["llama"];
    assert_eq!((llama.tp, llama.fp, llama.fn_, llama.tn), (0, 2, 2, 3));
    assert_eq!(llama.precision, 0.0);
    assert_eq!(llama.recall, 0.0);

    let written = read(&score_cfg.output_path);
    assert_eq!(written["qwen"]["TP"], json!(1));
    assert_eq!(written["llama"]["total"], json!(7));

    // same run with the universe taken from the merged files
    let from_annotations = score::run(&ScoreConfig {
        universe: UniverseSource::Annotations,
        ..score_cfg
    })
    .unwrap();
    // video s1..s5 + maps s1
    assert_eq!(from_annotations["qwen"].total, 6);

    let partitions = partition::run_partition(&PartitionConfig {
        merged_dir: root.join("anno_human_ai_2"),
        output_dir: root.join("anno_comp_2"),
        models: vec!["qwen".into(), "gemini".into()],
    })
    .unwrap();
    assert!(partitions[1].1.is_none());
    let qwen_parts = partitions[0].1.as_ref().unwrap();
    assert!(qwen_parts.both.contains("video", "s1"));
    assert!(qwen_parts.ai_only.contains("video", "s2"));
    assert!(qwen_parts.human_only.contains("video", "s3"));
    assert!(root.join("anno_comp_2/qwen/human_only.json").exists());

    let confirmed = partition::run_confirm(&ConfirmConfig {
        benchmark_path: bench_cfg.full_path(),
        output_path: root.join("Benchmark/benchmark_false.json"),
        min_models: 2,
    })
    .unwrap();
    assert_eq!(
        serde_json::to_value(&confirmed).unwrap(),
        json!({"video": {"s2": {"ai": ["llama", "qwen"], "human": false}}})
    );
}

#[test]
fn save_then_load_matches_normalized_input() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = dir.path().join("legacy.json");
    write(
        &legacy,
        json!({"app1": {"s1": {"human": POSITIVE_LABEL}, "s2": "非高成本渲染组件遮挡"}}),
    );

    let set = store::load(&legacy);
    let canonical = dir.path().join("canonical.json");
    store::save(&canonical, &set).unwrap();

    assert_eq!(store::load(&canonical), set);
    assert_eq!(
        read(&canonical)["app1"]["s1"],
        json!({"human": {"label": POSITIVE_LABEL, "annotator": "Human"}})
    );
}
