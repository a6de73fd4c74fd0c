//! Annotation records and the two-level `app → sample` mapping they live in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Human category that counts as a positive (a high-cost component is occluded).
pub const POSITIVE_LABEL: &str = "高成本渲染组件遮挡";
/// Human category for occlusions that do not involve a high-cost component.
pub const NEGATIVE_LABEL: &str = "非高成本渲染组件遮挡";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

impl Role {
    pub fn key(self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Ai => "ai",
        }
    }

    /// Annotator name stamped on records upgraded from a bare label.
    pub fn default_annotator(self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Ai => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HumanLabel {
    #[serde(rename = "高成本渲染组件遮挡")]
    HighCostOccluded,
    #[serde(rename = "非高成本渲染组件遮挡")]
    NonHighCostOcclusion,
}

impl HumanLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            HumanLabel::HighCostOccluded => POSITIVE_LABEL,
            HumanLabel::NonHighCostOcclusion => NEGATIVE_LABEL,
        }
    }

    pub fn is_positive(self) -> bool {
        self == HumanLabel::HighCostOccluded
    }
}

impl fmt::Display for HumanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError(String);

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown label {:?} (expected {POSITIVE_LABEL}, {NEGATIVE_LABEL}, \
             high-cost-occluded or non-high-cost-occlusion)",
            self.0
        )
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for HumanLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            POSITIVE_LABEL | "high-cost-occluded" => Ok(HumanLabel::HighCostOccluded),
            NEGATIVE_LABEL | "non-high-cost-occlusion" => Ok(HumanLabel::NonHighCostOcclusion),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiLabel {
    Yes,
    No,
}

impl AiLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            AiLabel::Yes => "Yes",
            AiLabel::No => "No",
        }
    }
}

/// A human judgment as written by the annotation UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanAnnotation {
    pub label: HumanLabel,
    pub annotator: String,
}

impl HumanAnnotation {
    pub fn new(label: HumanLabel) -> Self {
        Self {
            label,
            annotator: Role::Human.default_annotator().to_string(),
        }
    }
}

/// A model judgment as produced by the auto-annotation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnnotation {
    pub label: AiLabel,
    pub reason: String,
    pub solution: String,
    pub annotator: String,
    pub model_used: String,
    pub annotation_timestamp: String,
}

/// One role's sub-record.
///
/// Stored as the raw JSON object so fields written by older tool versions
/// survive a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(Map<String, Value>);

impl Annotation {
    pub fn from_object(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// `{label, annotator}` with the role's default annotator.
    pub fn from_label(label: &str, role: Role) -> Self {
        let mut map = Map::new();
        map.insert("label".into(), Value::String(label.to_string()));
        map.insert(
            "annotator".into(),
            Value::String(role.default_annotator().to_string()),
        );
        Self(map)
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get("label").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<HumanAnnotation> for Annotation {
    fn from(h: HumanAnnotation) -> Self {
        let mut map = Map::new();
        map.insert("label".into(), Value::String(h.label.as_str().to_string()));
        map.insert("annotator".into(), Value::String(h.annotator));
        Self(map)
    }
}

impl From<AiAnnotation> for Annotation {
    fn from(a: AiAnnotation) -> Self {
        let mut map = Map::new();
        map.insert("label".into(), Value::String(a.label.as_str().to_string()));
        map.insert("reason".into(), Value::String(a.reason));
        map.insert("solution".into(), Value::String(a.solution));
        map.insert("annotator".into(), Value::String(a.annotator));
        map.insert("model_used".into(), Value::String(a.model_used));
        map.insert(
            "annotation_timestamp".into(),
            Value::String(a.annotation_timestamp),
        );
        Self(map)
    }
}

/// Everything known about one `(app, sample)` pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Annotation>,
}

impl AnnotationRecord {
    pub fn role(&self, role: Role) -> Option<&Annotation> {
        match role {
            Role::Human => self.human.as_ref(),
            Role::Ai => self.ai.as_ref(),
        }
    }

    pub fn set(&mut self, role: Role, value: Annotation) {
        match role {
            Role::Human => self.human = Some(value),
            Role::Ai => self.ai = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.human.is_none() && self.ai.is_none()
    }

    pub fn is_human_positive(&self) -> bool {
        self.human.as_ref().and_then(Annotation::label) == Some(POSITIVE_LABEL)
    }

    pub fn is_human_negative(&self) -> bool {
        self.human.as_ref().and_then(Annotation::label) == Some(NEGATIVE_LABEL)
    }

    pub fn is_ai_yes(&self) -> bool {
        self.ai.as_ref().and_then(Annotation::label) == Some(AiLabel::Yes.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SampleKey {
    pub app: String,
    pub sample: String,
}

impl SampleKey {
    pub fn new(app: impl Into<String>, sample: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            sample: sample.into(),
        }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.sample)
    }
}

/// `app → sample → record`. Built through the normalizer; see [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    apps: BTreeMap<String, BTreeMap<String, AnnotationRecord>>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, app: &str, sample: &str) -> Option<&AnnotationRecord> {
        self.apps.get(app).and_then(|samples| samples.get(sample))
    }

    pub fn contains(&self, app: &str, sample: &str) -> bool {
        self.get(app, sample).is_some()
    }

    // materializes the app level on first use
    fn entry(&mut self, app: &str, sample: &str) -> &mut AnnotationRecord {
        self.apps
            .entry(app.to_string())
            .or_default()
            .entry(sample.to_string())
            .or_default()
    }

    /// Sets `set[app][sample][role] = value`, replacing any earlier value for
    /// that role wholesale. The other role is left alone.
    pub fn upsert(&mut self, app: &str, sample: &str, role: Role, value: Annotation) {
        self.entry(app, sample).set(role, value);
    }

    /// Inserts a whole record; empty records are refused.
    pub fn insert(&mut self, app: &str, sample: &str, record: AnnotationRecord) -> bool {
        if record.is_empty() {
            return false;
        }
        *self.entry(app, sample) = record;
        true
    }

    pub fn apps(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, AnnotationRecord>)> {
        self.apps.iter().map(|(app, samples)| (app.as_str(), samples))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &AnnotationRecord)> {
        self.apps.iter().flat_map(|(app, samples)| {
            samples
                .iter()
                .map(move |(sample, record)| (app.as_str(), sample.as_str(), record))
        })
    }

    pub fn keys(&self) -> BTreeSet<SampleKey> {
        self.iter()
            .map(|(app, sample, _)| SampleKey::new(app, sample))
            .collect()
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Number of samples across all apps.
    pub fn len(&self) -> usize {
        self.apps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
