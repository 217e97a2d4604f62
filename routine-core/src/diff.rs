//! Draft vs. snapshot diff
//!
//! Classifies every exercise into a creation, update, deletion or no-op by
//! identity, and records which observable fields changed for each update.
//! Weights are compared with a tolerance to absorb JSON float round-trips.

use crate::types::{DraftExercise, ExerciseId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::Day;
use std::collections::{HashMap, HashSet};

/// Float comparison tolerance
const FLOAT_EPSILON: f64 = 1e-9;

/// One changed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: Value,
    pub to: Value,
}

/// A persisted exercise whose fields differ from the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseChange {
    pub id: i64,
    /// Current (draft) version, including its current order index
    pub exercise: DraftExercise,
    /// Snapshot version; `None` when the server copy is unknown
    pub previous: Option<DraftExercise>,
    pub changes: Vec<FieldChange>,
}

/// Operations that bring the snapshot in line with the draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub creations: Vec<DraftExercise>,
    pub updates: Vec<ExerciseChange>,
    /// Snapshot versions of the removed exercises
    pub deletions: Vec<DraftExercise>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.creations.is_empty() && self.updates.is_empty() && self.deletions.is_empty()
    }

    /// Total number of remote operations
    pub fn len(&self) -> usize {
        self.creations.len() + self.updates.len() + self.deletions.len()
    }

    /// Keep only operations touching `days`
    ///
    /// An update is kept when either its old or new day is listed, so a
    /// day-move is pushed together with either side.
    pub fn retain_days(&mut self, days: &[Day]) {
        self.creations.retain(|e| days.contains(&e.day));
        self.updates.retain(|c| {
            days.contains(&c.exercise.day)
                || c.previous.as_ref().is_some_and(|p| days.contains(&p.day))
        });
        self.deletions.retain(|e| days.contains(&e.day));
    }
}

fn weights_equal(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() < FLOAT_EPSILON,
        _ => false,
    }
}

fn record<T: PartialEq + Serialize>(changes: &mut Vec<FieldChange>, field: &str, from: &T, to: &T) {
    if from != to {
        changes.push(FieldChange {
            field: field.to_string(),
            from: json!(from),
            to: json!(to),
        });
    }
}

/// Observable field differences between two versions of one exercise
///
/// Identity is not an observable field.
pub fn field_changes(from: &DraftExercise, to: &DraftExercise) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    record(&mut changes, "name", &from.name, &to.name);
    record(&mut changes, "day", &from.day, &to.day);
    record(&mut changes, "series", &from.series, &to.series);
    record(&mut changes, "repetitions", &from.repetitions, &to.repetitions);
    if !weights_equal(from.weight, to.weight) {
        changes.push(FieldChange {
            field: "weight".to_string(),
            from: json!(from.weight),
            to: json!(to.weight),
        });
    }
    record(&mut changes, "notes", &from.notes, &to.notes);
    record(&mut changes, "order", &from.order, &to.order);
    changes
}

/// Every observable field of `to`, as changes from nothing
fn all_fields(to: &DraftExercise) -> Vec<FieldChange> {
    let Value::Object(fields) = json!(to) else {
        return Vec::new();
    };
    fields
        .into_iter()
        .filter(|(field, _)| field != "id")
        .map(|(field, value)| FieldChange {
            field,
            from: Value::Null,
            to: value,
        })
        .collect()
}

fn sequence_key(e: &DraftExercise) -> (Day, u32, Option<i64>) {
    (e.day, e.order, e.id.persisted())
}

/// Compute the change-set from `original` (snapshot) to `current` (draft)
///
/// - transient entries in `current` are creations;
/// - persisted entries of `original` missing from `current` are deletions;
/// - persisted entries present in both with differing fields are updates.
///
/// A persisted entry of `current` that the snapshot does not know is sent as
/// an update carrying every field; the server decides whether it still exists.
/// Transient entries of `original` are ignored since they were never persisted.
/// Output lists are sorted by day, then order.
pub fn diff(original: &[DraftExercise], current: &[DraftExercise]) -> ChangeSet {
    let before: HashMap<i64, &DraftExercise> = original
        .iter()
        .filter_map(|e| e.id.persisted().map(|id| (id, e)))
        .collect();

    let mut set = ChangeSet::default();
    let mut kept: HashSet<i64> = HashSet::with_capacity(current.len());

    for entry in current {
        match entry.id {
            ExerciseId::Transient(_) => set.creations.push(entry.clone()),
            ExerciseId::Persisted(id) => {
                kept.insert(id);
                match before.get(&id) {
                    Some(previous) => {
                        let changes = field_changes(previous, entry);
                        if !changes.is_empty() {
                            set.updates.push(ExerciseChange {
                                id,
                                exercise: entry.clone(),
                                previous: Some((*previous).clone()),
                                changes,
                            });
                        }
                    }
                    None => set.updates.push(ExerciseChange {
                        id,
                        exercise: entry.clone(),
                        previous: None,
                        changes: all_fields(entry),
                    }),
                }
            }
        }
    }

    set.deletions = before
        .iter()
        .filter(|(id, _)| !kept.contains(*id))
        .map(|(_, e)| (*e).clone())
        .collect();

    set.creations.sort_by_key(sequence_key);
    set.updates.sort_by_key(|c| sequence_key(&c.exercise));
    set.deletions.sort_by_key(sequence_key);
    set
}
