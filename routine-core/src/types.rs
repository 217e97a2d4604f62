//! Draft-side types
//!
//! A draft is a flat list of [`DraftExercise`] entries; the per-day grouping
//! is derived from the `day`/`order` attributes rather than stored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::{Day, ExerciseCreate, ExerciseUpdate, RoutineDetail};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

const TRANSIENT_PREFIX: &str = "new-";

/// Local identity of an exercise that exists only in the draft
///
/// Rendered as `new-<n>`, which can never collide with a server ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TransientId(pub u64);

impl fmt::Display for TransientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TRANSIENT_PREFIX, self.0)
    }
}

impl FromStr for TransientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(TRANSIENT_PREFIX)
            .and_then(|n| n.parse().ok())
            .map(TransientId)
            .ok_or_else(|| format!("Invalid transient id: '{s}'"))
    }
}

impl From<TransientId> for String {
    fn from(id: TransientId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TransientId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Exercise identity: server-assigned or draft-local
///
/// Serialized untagged: persisted IDs as numbers, transient ones as
/// `"new-<n>"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseId {
    Persisted(i64),
    Transient(TransientId),
}

impl ExerciseId {
    /// Server ID, if this exercise has been persisted
    pub fn persisted(&self) -> Option<i64> {
        match self {
            Self::Persisted(id) => Some(*id),
            Self::Transient(_) => None,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "{id}"),
            Self::Transient(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for ExerciseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(TRANSIENT_PREFIX) {
            return s.parse().map(Self::Transient);
        }
        s.parse()
            .map(Self::Persisted)
            .map_err(|_| format!("Invalid exercise id: '{s}'"))
    }
}

/// User-editable exercise fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseFields {
    pub name: String,
    pub series: u32,
    pub repetitions: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExerciseFields {
    pub fn new(name: impl Into<String>, series: u32, repetitions: u32) -> Self {
        Self {
            name: name.into(),
            series,
            repetitions,
            weight: None,
            notes: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Blank notes are stored as absent
    pub(crate) fn normalized(mut self) -> Self {
        if self.notes.as_deref().is_some_and(|n| n.trim().is_empty()) {
            self.notes = None;
        }
        self
    }
}

/// One exercise in a draft or snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftExercise {
    pub id: ExerciseId,
    pub name: String,
    pub day: Day,
    pub series: u32,
    pub repetitions: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    /// 1-based position within `day`
    pub order: u32,
}

impl DraftExercise {
    pub(crate) fn from_fields(id: ExerciseId, day: Day, order: u32, fields: ExerciseFields) -> Self {
        Self {
            id,
            name: fields.name,
            day,
            series: fields.series,
            repetitions: fields.repetitions,
            weight: fields.weight,
            notes: fields.notes,
            order,
        }
    }

    pub(crate) fn apply_fields(&mut self, fields: ExerciseFields) {
        self.name = fields.name;
        self.series = fields.series;
        self.repetitions = fields.repetitions;
        self.weight = fields.weight;
        self.notes = fields.notes;
    }

    pub fn fields(&self) -> ExerciseFields {
        ExerciseFields {
            name: self.name.clone(),
            series: self.series,
            repetitions: self.repetitions,
            weight: self.weight,
            notes: self.notes.clone(),
        }
    }

    /// Creation payload (carries no identity)
    pub fn to_create(&self, routine_id: i64) -> ExerciseCreate {
        ExerciseCreate {
            routine_id,
            name: self.name.clone(),
            day: self.day,
            series: self.series,
            repetitions: self.repetitions,
            weight: self.weight,
            notes: self.notes.clone(),
            order: self.order,
        }
    }

    /// Update payload
    ///
    /// The server skips `null` fields on update, so absent notes go out as
    /// an empty string; loading reads a blank note back as absent.
    pub fn to_update(&self, routine_id: i64) -> ExerciseUpdate {
        ExerciseUpdate {
            routine_id,
            name: self.name.clone(),
            day: self.day,
            series: self.series,
            repetitions: self.repetitions,
            weight: self.weight,
            notes: Some(self.notes.clone().unwrap_or_default()),
            order: self.order,
        }
    }
}

/// Routine-level fields of a draft
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutineHeader {
    /// `None` until the routine has been created remotely
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// What the server is known to hold for one routine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutineSnapshot {
    pub header: RoutineHeader,
    pub exercises: Vec<DraftExercise>,
}

/// Blank text columns read as absent
fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

impl TryFrom<&RoutineDetail> for RoutineSnapshot {
    type Error = CoreError;

    /// Flattens the per-day grouping.
    ///
    /// A missing order index is kept as `0` (never a valid position), so the
    /// draft renumbers it to the end of its day.
    fn try_from(detail: &RoutineDetail) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        let mut exercises = Vec::with_capacity(detail.exercise_count());

        for (label, entries) in &detail.exercises_by_day {
            let day: Day = label.parse().map_err(|_| {
                CoreError::Load(format!(
                    "routine {} has exercises under non-canonical day '{}'",
                    detail.id, label
                ))
            })?;

            for entry in entries {
                if !seen.insert(entry.id) {
                    return Err(CoreError::Load(format!(
                        "exercise {} appears more than once",
                        entry.id
                    )));
                }
                let series = entry.series.ok_or_else(|| {
                    CoreError::Load(format!("exercise {} has no series count", entry.id))
                })?;
                let repetitions = entry.repetitions.ok_or_else(|| {
                    CoreError::Load(format!("exercise {} has no repetitions count", entry.id))
                })?;

                exercises.push(DraftExercise {
                    id: ExerciseId::Persisted(entry.id),
                    name: entry.name.clone(),
                    day,
                    series,
                    repetitions,
                    weight: entry.weight,
                    notes: non_blank(entry.notes.as_deref()),
                    order: entry.order.unwrap_or(0),
                });
            }
        }

        Ok(Self {
            header: RoutineHeader {
                id: Some(detail.id),
                name: detail.name.clone(),
                description: non_blank(detail.description.as_deref()),
                created_at: detail.created_at,
            },
            exercises,
        })
    }
}
