//! Reading and writing annotation files.
//!
//! Writes replace the whole file. There is no locking: when the annotation UI
//! and a batch run write the same file, whichever saves last wins and the
//! other's updates are lost.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::normalize::normalize_set;
use crate::record::AnnotationSet;

pub fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Loads and normalizes; missing or malformed files are errors.
pub fn try_load(path: &Path) -> Result<AnnotationSet> {
    Ok(normalize_set(read_json(path)?))
}

/// Loads and normalizes; missing or malformed files give an empty set.
pub fn load(path: &Path) -> AnnotationSet {
    if !path.exists() {
        info!("{} does not exist yet; starting empty", path.display());
        return AnnotationSet::new();
    }
    match try_load(path) {
        Ok(set) => set,
        Err(e) => {
            warn!("{e:#}; starting empty");
            AnnotationSet::new()
        }
    }
}

pub fn save(path: &Path, set: &AnnotationSet) -> Result<()> {
    write_json(path, set)
}

/// Pretty-prints `value` into a sibling temp file and renames it over `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let tmp = temp_path(path);
    let pretty = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, pretty).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} → {}", tmp.display(), path.display()))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "annotations.json".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// `*.json` files directly inside `dir`, sorted by name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Every `<model>.json` in `dir` as `(model, set)`. Unreadable files are
/// logged and left out so one bad model never blocks the others.
pub fn load_model_dir(dir: &Path) -> Result<Vec<(String, AnnotationSet)>> {
    let mut models = Vec::new();
    for path in json_files(dir)? {
        let Some(model) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match try_load(&path) {
            Ok(set) => models.push((model.to_string(), set)),
            Err(e) => warn!("skipping model {model}: {e:#}"),
        }
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{HumanAnnotation, HumanLabel, Role};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("nope.json")).is_empty());
    }

    #[test]
    fn malformed_file_loads_empty_but_try_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).is_empty());
        assert!(try_load(&path).is_err());
    }

    #[test]
    fn save_creates_parents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/gemini.json");
        let mut set = AnnotationSet::new();
        set.upsert(
            "app",
            "sample_01",
            Role::Human,
            HumanAnnotation::new(HumanLabel::HighCostOccluded).into(),
        );

        save(&path, &set).unwrap();

        assert_eq!(load(&path), set);
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn saved_file_keeps_labels_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gt.json");
        let mut set = AnnotationSet::new();
        set.upsert(
            "app",
            "s",
            Role::Human,
            HumanAnnotation::new(HumanLabel::NonHighCostOcclusion).into(),
        );
        save(&path, &set).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(HumanLabel::NonHighCostOcclusion.as_str()));
    }

    #[test]
    fn model_dir_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("qwen.json"), r#"{"a": {"s": {"ai": {"label": "Yes"}}}}"#)
            .unwrap();
        fs::write(dir.path().join("llama.json"), "[oops").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let models = load_model_dir(dir.path()).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].0, "qwen");
    }
}
