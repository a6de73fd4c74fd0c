//! Folding the different annotation file shapes into [`AnnotationSet`].
//!
//! Files written by older tool versions store a sample either as a bare label
//! string, as a flat human-judgment object, or as the current
//! `{human?, ai?}` object. Every value is classified into a [`RawRecord`]
//! first and each variant is turned into an [`AnnotationRecord`] in one place.
//! Running a canonical set through here again gives back the same set.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::record::{Annotation, AnnotationRecord, AnnotationSet, Role};

/// Field that marks the flat human-judgment objects of the first UI version.
pub const LEGACY_HUMAN_FLAG: &str = "label_problem_exists";

#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// `{human?, ai?, ...}`; other keys at this level are ignored.
    RoleTagged {
        human: Option<Value>,
        ai: Option<Value>,
    },
    /// Flat object carrying [`LEGACY_HUMAN_FLAG`].
    FlatHuman(Map<String, Value>),
    /// Any other object, assumed to be a bare human judgment.
    Unrecognized(Map<String, Value>),
    StringLabel(String),
    Invalid(Value),
}

impl RawRecord {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if map.contains_key(Role::Human.key()) || map.contains_key(Role::Ai.key()) {
                    RawRecord::RoleTagged {
                        human: map.remove(Role::Human.key()),
                        ai: map.remove(Role::Ai.key()),
                    }
                } else if map.contains_key(LEGACY_HUMAN_FLAG) {
                    RawRecord::FlatHuman(map)
                } else {
                    RawRecord::Unrecognized(map)
                }
            }
            Value::String(label) => RawRecord::StringLabel(label),
            other => RawRecord::Invalid(other),
        }
    }

    /// `None` when nothing usable is left.
    pub fn into_record(self) -> Option<AnnotationRecord> {
        let record = match self {
            RawRecord::RoleTagged { human, ai } => AnnotationRecord {
                human: human.and_then(|v| role_value(v, Role::Human)),
                ai: ai.and_then(|v| role_value(v, Role::Ai)),
            },
            RawRecord::FlatHuman(map) | RawRecord::Unrecognized(map) => AnnotationRecord {
                human: Some(Annotation::from_object(map)),
                ai: None,
            },
            RawRecord::StringLabel(label) => AnnotationRecord {
                human: Some(Annotation::from_label(&label, Role::Human)),
                ai: None,
            },
            RawRecord::Invalid(_) => return None,
        };
        (!record.is_empty()).then_some(record)
    }
}

fn role_value(value: Value, role: Role) -> Option<Annotation> {
    match value {
        Value::Object(map) => Some(Annotation::from_object(map)),
        Value::String(label) => Some(Annotation::from_label(&label, role)),
        Value::Null => None,
        other => {
            warn!("dropping {role} sub-record of unexpected type: {other}");
            None
        }
    }
}

pub fn normalize_record(value: Value) -> Option<AnnotationRecord> {
    RawRecord::classify(value).into_record()
}

/// Normalizes a whole `{app: {sample: value}}` document. Bad entries are
/// logged and skipped; the rest of the document still loads.
pub fn normalize_set(raw: Value) -> AnnotationSet {
    let mut set = AnnotationSet::new();

    let Value::Object(apps) = raw else {
        warn!("annotation document is not a JSON object; treating as empty");
        return set;
    };

    for (app, samples) in apps {
        let Value::Object(samples) = samples else {
            warn!("app {app}: samples are not a JSON object; skipped");
            continue;
        };

        for (sample, value) in samples {
            let raw = RawRecord::classify(value);
            match &raw {
                RawRecord::Unrecognized(_) => {
                    debug!("{app}/{sample}: unrecognized object, kept as human annotation")
                }
                RawRecord::Invalid(v) => {
                    warn!("{app}/{sample}: unsupported value {v}; skipped");
                    continue;
                }
                _ => {}
            }
            match raw.into_record() {
                Some(record) => {
                    set.insert(&app, &sample, record);
                }
                None => warn!("{app}/{sample}: no human or ai annotation left; dropped"),
            }
        }
    }
    set
}
