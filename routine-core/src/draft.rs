//! Draft Store
//!
//! Holds what the user currently sees (the draft) next to what the server is
//! known to have (the snapshot). Every mutation validates first and only then
//! touches the draft, so a failed call leaves it exactly as it was.

use crate::diff::{self, ChangeSet};
use crate::error::{CoreError, CoreResult};
use crate::ordering;
use crate::types::{
    DraftExercise, ExerciseFields, ExerciseId, RoutineHeader, RoutineSnapshot, TransientId,
};
use crate::validation::{validate_exercise, validate_routine};
use serde::Serialize;
use shared::{Day, Routine, RoutineDetail};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Saved draft state for optimistic mutations
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    header: RoutineHeader,
    exercises: Vec<DraftExercise>,
}

/// Per-routine figures for summary views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutineStats {
    pub total_exercises: usize,
    pub total_series: u64,
    pub per_day: BTreeMap<Day, usize>,
    /// Day with the most exercises; the earlier day wins ties
    pub busiest_day: Option<Day>,
}

/// Editable routine draft plus its last confirmed snapshot
#[derive(Debug, Clone)]
pub struct DraftStore {
    header: RoutineHeader,
    exercises: Vec<DraftExercise>,
    snapshot: RoutineSnapshot,
    next_transient: u64,
}

impl DraftStore {
    /// Empty draft for a routine that does not exist remotely yet
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let header = RoutineHeader {
            id: None,
            name: name.into(),
            description,
            created_at: None,
        };
        Self {
            header: header.clone(),
            exercises: Vec::new(),
            snapshot: RoutineSnapshot {
                header,
                exercises: Vec::new(),
            },
            next_transient: 1,
        }
    }

    /// Draft of an existing routine, from its remote detail
    pub fn load(detail: &RoutineDetail) -> CoreResult<Self> {
        Self::from_snapshot(RoutineSnapshot::try_from(detail)?)
    }

    /// Draft from an already-flattened snapshot
    ///
    /// The snapshot is kept as given; the draft copy is renumbered so every
    /// day reads `1..n` even when the server holds gaps.
    pub fn from_snapshot(snapshot: RoutineSnapshot) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for entry in &snapshot.exercises {
            if entry.id.is_transient() {
                return Err(CoreError::Load(format!(
                    "snapshot contains unsaved exercise {}",
                    entry.id
                )));
            }
            if !seen.insert(entry.id) {
                return Err(CoreError::Load(format!(
                    "exercise {} appears more than once",
                    entry.id
                )));
            }
        }

        let mut exercises = snapshot.exercises.clone();
        ordering::normalize(&mut exercises);
        debug!(
            routine_id = ?snapshot.header.id,
            exercises = exercises.len(),
            "Draft loaded"
        );

        Ok(Self {
            header: snapshot.header.clone(),
            exercises,
            snapshot,
            next_transient: 1,
        })
    }

    /// New unsaved draft copying `source`'s exercises under a new name
    ///
    /// Every copy gets a transient identity; days and order are preserved.
    pub fn duplicate(source: &RoutineSnapshot, name: impl Into<String>) -> Self {
        let mut draft = Self::new(name, source.header.description.clone());
        let mut copies = source.exercises.clone();
        ordering::normalize(&mut copies);
        copies.sort_by_key(|e| (e.day, e.order));
        for mut copy in copies {
            copy.id = draft.allocate_id();
            draft.exercises.push(copy);
        }
        draft
    }

    // ========== Read accessors ==========

    pub fn header(&self) -> &RoutineHeader {
        &self.header
    }

    pub fn routine_id(&self) -> Option<i64> {
        self.header.id
    }

    /// Flat draft entries, in no particular order
    pub fn exercises(&self) -> &[DraftExercise] {
        &self.exercises
    }

    pub fn snapshot(&self) -> &RoutineSnapshot {
        &self.snapshot
    }

    pub fn get(&self, id: &ExerciseId) -> Option<&DraftExercise> {
        self.exercises.iter().find(|e| e.id == *id)
    }

    /// Current draft grouped by day (week order), each day in sequence
    pub fn grouped(&self) -> BTreeMap<Day, Vec<&DraftExercise>> {
        ordering::group_by_day(&self.exercises)
    }

    /// One day's entries in sequence
    pub fn day(&self, day: Day) -> Vec<&DraftExercise> {
        ordering::day_sequence(&self.exercises, day)
    }

    /// Draft as an owned snapshot value
    pub fn to_snapshot(&self) -> RoutineSnapshot {
        RoutineSnapshot {
            header: self.header.clone(),
            exercises: self.exercises.clone(),
        }
    }

    /// Operations needed to bring the snapshot in line with the draft
    pub fn change_set(&self) -> ChangeSet {
        diff::diff(&self.snapshot.exercises, &self.exercises)
    }

    /// Whether anything differs from the snapshot
    pub fn is_dirty(&self) -> bool {
        self.header != self.snapshot.header || !self.change_set().is_empty()
    }

    pub fn stats(&self) -> RoutineStats {
        let mut per_day: BTreeMap<Day, usize> = BTreeMap::new();
        for entry in &self.exercises {
            *per_day.entry(entry.day).or_default() += 1;
        }
        // max_by_key keeps the last maximum, so scan from Sunday back
        let busiest_day = per_day
            .iter()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(day, _)| *day);

        RoutineStats {
            total_exercises: self.exercises.len(),
            total_series: self.exercises.iter().map(|e| u64::from(e.series)).sum(),
            per_day,
            busiest_day,
        }
    }

    // ========== Mutations ==========

    /// Rename / redescribe the routine
    pub fn set_details(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> CoreResult<()> {
        let name = name.into();
        let description = description.filter(|d| !d.trim().is_empty());
        validate_routine(&name, description.as_deref())?;
        self.header.name = name;
        self.header.description = description;
        Ok(())
    }

    /// Append an exercise to `day` with a transient identity
    pub fn add_exercise(&mut self, day: Day, fields: ExerciseFields) -> CoreResult<&DraftExercise> {
        let fields = fields.normalized();
        validate_exercise(&fields)?;

        let order = ordering::next_order(&self.exercises, day);
        let id = self.allocate_id();
        debug!(%id, %day, order, "Exercise added to draft");
        self.exercises
            .push(DraftExercise::from_fields(id, day, order, fields));
        Ok(&self.exercises[self.exercises.len() - 1])
    }

    /// Replace an exercise's fields, moving it when `day` names another day
    ///
    /// Identity and order are preserved unless the exercise changes day, in
    /// which case it is appended to the new day and the old day is closed up.
    pub fn update_exercise(
        &mut self,
        id: &ExerciseId,
        fields: ExerciseFields,
        day: Option<Day>,
    ) -> CoreResult<&DraftExercise> {
        let fields = fields.normalized();
        validate_exercise(&fields)?;
        let index = self.index_of(id)?;

        self.exercises[index].apply_fields(fields);
        if let Some(new_day) = day {
            ordering::move_to_day(&mut self.exercises, index, new_day);
        }
        debug!(%id, day = %self.exercises[index].day, "Exercise updated in draft");
        Ok(&self.exercises[index])
    }

    /// Move an exercise to the end of another day, keeping its fields
    pub fn move_exercise(&mut self, id: &ExerciseId, day: Day) -> CoreResult<&DraftExercise> {
        let index = self.index_of(id)?;
        ordering::move_to_day(&mut self.exercises, index, day);
        Ok(&self.exercises[index])
    }

    /// Delete an exercise and renumber the rest of its day
    pub fn remove_exercise(&mut self, id: &ExerciseId) -> CoreResult<DraftExercise> {
        let index = self.index_of(id)?;
        let removed = self.exercises.remove(index);
        ordering::renumber_day(&mut self.exercises, removed.day);
        debug!(%id, day = %removed.day, "Exercise removed from draft");
        Ok(removed)
    }

    /// Reassign `day`'s order from a full permutation of its entries
    pub fn reorder_day(&mut self, day: Day, ordering: &[ExerciseId]) -> CoreResult<()> {
        ordering::apply_ordering(&mut self.exercises, day, ordering)?;
        debug!(%day, count = ordering.len(), "Day reordered in draft");
        Ok(())
    }

    /// Snapshot := draft (after a fully successful sync)
    pub fn commit(&mut self) {
        self.snapshot = self.to_snapshot();
    }

    /// Draft := snapshot
    pub fn rollback(&mut self) {
        self.header = self.snapshot.header.clone();
        self.exercises = self.snapshot.exercises.clone();
        ordering::normalize(&mut self.exercises);
    }

    // ========== Sync support ==========

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            header: self.header.clone(),
            exercises: self.exercises.clone(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.header = checkpoint.header;
        self.exercises = checkpoint.exercises;
    }

    /// Record the server identity of a newly created routine
    ///
    /// Sets the ID on both the draft and the snapshot header.
    pub(crate) fn assign_routine(&mut self, routine: &Routine) {
        self.header.id = Some(routine.id);
        self.header.created_at = routine.created_at;
        self.snapshot.header.id = Some(routine.id);
        self.snapshot.header.created_at = routine.created_at;
    }

    /// Swap transient identities for the ones the server assigned
    pub(crate) fn assign_ids(&mut self, created: &[(ExerciseId, i64)]) {
        for (transient, persisted) in created {
            if let Some(entry) = self.exercises.iter_mut().find(|e| e.id == *transient) {
                entry.id = ExerciseId::Persisted(*persisted);
            }
        }
    }

    /// Fold the draft version of `ids` into the snapshot
    ///
    /// IDs absent from the draft are dropped from the snapshot.
    pub(crate) fn commit_exercises(&mut self, ids: &[i64]) {
        for &id in ids {
            let id = ExerciseId::Persisted(id);
            self.snapshot.exercises.retain(|e| e.id != id);
            if let Some(entry) = self.get(&id).cloned() {
                self.snapshot.exercises.push(entry);
            }
        }
    }

    /// Replace only the snapshot, keeping the draft
    pub(crate) fn refresh_snapshot(&mut self, snapshot: RoutineSnapshot) {
        self.snapshot = snapshot;
    }

    fn allocate_id(&mut self) -> ExerciseId {
        let id = TransientId(self.next_transient);
        self.next_transient += 1;
        ExerciseId::Transient(id)
    }

    fn index_of(&self, id: &ExerciseId) -> CoreResult<usize> {
        self.exercises
            .iter()
            .position(|e| e.id == *id)
            .ok_or(CoreError::NotFound(*id))
    }
}
