//! Screenshot directories on disk.
//!
//! Image files are named `<sample_id>__<frame>...`, e.g.
//! `sample_01__current_sample_01_overlap_vis_screenCap_392252181613.png_1.png`,
//! one directory per app.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use regex::Regex;

use crate::config::RekeyConfig;
use crate::record::{AnnotationSet, SampleKey};
use crate::store;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const FRAME_MARKERS: [&str; 3] = ["__before", "__current", "__after"];
const OVERLAP_MARKER: &str = "overlap_vis_screenCap_";

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Sample id of a frame image, or `None` if the file is not one.
pub fn sample_id_of(file_name: &str) -> Option<&str> {
    if !is_image(file_name) || !FRAME_MARKERS.iter().any(|m| file_name.contains(m)) {
        return None;
    }
    file_name.split("__").next().filter(|id| !id.is_empty())
}

fn sorted_dir_names(dir: &Path, want_dirs: bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() != want_dirs {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Every `(app, sample_id)` with at least one frame image under `root`.
pub fn scan_image_samples(root: &Path) -> Result<BTreeSet<SampleKey>> {
    let mut keys = BTreeSet::new();
    for app in sorted_dir_names(root, true)? {
        for file in sorted_dir_names(&root.join(&app), false)? {
            if let Some(sample) = sample_id_of(&file) {
                keys.insert(SampleKey::new(app.as_str(), sample));
            }
        }
    }
    info!("{}: {} samples found", root.display(), keys.len());
    Ok(keys)
}

/// Maps `(app, sample_id)` to the `screenCap_<n>.png` name of its overlap
/// visualization. Directory listings are cached per app.
pub struct ImageKeyResolver {
    root: PathBuf,
    pattern: Regex,
    listings: HashMap<String, Vec<String>>,
}

impl ImageKeyResolver {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            pattern: Regex::new(r"(screenCap_\d+\.png)")?,
            listings: HashMap::new(),
        })
    }

    fn listing(&mut self, app: &str) -> &[String] {
        let root = &self.root;
        self.listings.entry(app.to_string()).or_insert_with(|| {
            let dir = root.join(app);
            if !dir.is_dir() {
                return Vec::new();
            }
            sorted_dir_names(&dir, false).unwrap_or_else(|e| {
                warn!("{e:#}");
                Vec::new()
            })
        })
    }

    pub fn resolve(&mut self, app: &str, sample_id: &str) -> Option<String> {
        let prefix = format!("{sample_id}__current_");
        let pattern = self.pattern.clone();
        self.listing(app)
            .iter()
            .filter(|name| name.starts_with(&prefix) && name.contains(OVERLAP_MARKER))
            .find_map(|name| pattern.captures(name).map(|c| c[1].to_string()))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RekeyReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Re-keys every sample by its image key. Samples without an image are
/// dropped, and so are apps left with no samples.
pub fn rekey(set: &AnnotationSet, resolver: &mut ImageKeyResolver) -> (AnnotationSet, RekeyReport) {
    let mut out = AnnotationSet::new();
    let mut report = RekeyReport::default();

    let bar = ProgressBar::new(set.app_count() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {pos}/{len} {wide_bar:.cyan/blue} {msg}") {
        bar.set_style(style);
    }

    for (app, samples) in set.apps() {
        bar.set_message(app.to_string());
        for (sample, record) in samples {
            match resolver.resolve(app, sample) {
                Some(key) => {
                    if out.contains(app, &key) {
                        warn!("{app}: {key} matched more than one sample; keeping {sample}");
                    }
                    out.insert(app, &key, record.clone());
                    report.kept += 1;
                }
                None => {
                    info!("{app}/{sample}: no overlap image; dropped");
                    report.dropped += 1;
                }
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    (out, report)
}

pub fn run_rekey(cfg: &RekeyConfig) -> Result<RekeyReport> {
    let set = store::load(&cfg.input_path);
    let mut resolver = ImageKeyResolver::new(&cfg.vis_root)?;
    let (rekeyed, report) = rekey(&set, &mut resolver);
    store::save(&cfg.output_path, &rekeyed)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_set;
    use serde_json::json;

    fn touch(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn sample_id_needs_frame_marker_and_image_extension() {
        assert_eq!(sample_id_of("sample_01__current_x.png"), Some("sample_01"));
        assert_eq!(sample_id_of("sample_02__before.JPG"), Some("sample_02"));
        assert_eq!(sample_id_of("sample_03__current.txt"), None);
        assert_eq!(sample_id_of("thumbnail.png"), None);
    }

    #[test]
    fn scan_lists_samples_per_app() {
        let root = tempfile::tempdir().unwrap();
        let video = root.path().join("com.video");
        touch(&video, "sample_01__before.png");
        touch(&video, "sample_01__current.png");
        touch(&video, "sample_02__after.png");
        touch(&video, "readme.md");
        touch(&root.path().join("com.maps"), "sample_01__current.jpeg");

        let keys = scan_image_samples(root.path()).unwrap();
        let expected: BTreeSet<_> = [
            SampleKey::new("com.maps", "sample_01"),
            SampleKey::new("com.video", "sample_01"),
            SampleKey::new("com.video", "sample_02"),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn scan_of_missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(scan_image_samples(&root.path().join("absent")).is_err());
    }

    #[test]
    fn rekey_uses_screen_cap_names_and_drops_unmatched() {
        let root = tempfile::tempdir().unwrap();
        touch(
            &root.path().join("app"),
            "sample_01__current_sample_01_overlap_vis_screenCap_392252181613.png_1.png",
        );
        touch(&root.path().join("app"), "sample_02__current_plain.png");

        let set = normalize_set(json!({
            "app": {"sample_01": "高成本渲染组件遮挡", "sample_02": "高成本渲染组件遮挡"},
            "gone": {"sample_01": "高成本渲染组件遮挡"}
        }));
        let mut resolver = ImageKeyResolver::new(root.path()).unwrap();
        let (out, report) = rekey(&set, &mut resolver);

        assert_eq!(report, RekeyReport { kept: 1, dropped: 2 });
        assert!(out.contains("app", "screenCap_392252181613.png"));
        assert_eq!(out.app_count(), 1);
    }
}
