//! In-memory RemoteStore
//!
//! Mirrors the server's observable rules (unique routine names, exercises
//! need an existing routine, deleting a routine drops its exercises, `null`
//! fields are skipped on update) and records every call so sync behavior can
//! be asserted. Failures can be scripted per call.

use crate::remote::{RemoteError, RemoteResult, RemoteStore};
use async_trait::async_trait;
use chrono::Local;
use parking_lot::Mutex;
use shared::{
    DayExercise, Exercise, ExerciseCreate, ExerciseUpdate, Routine, RoutineCreate, RoutineDetail,
    RoutineUpdate,
};
use std::collections::BTreeMap;

/// Group key the server uses for exercises without a day
const UNASSIGNED_DAY: &str = "Sin día asignado";

/// One recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    CreateRoutine,
    ListRoutines,
    SearchRoutines(String),
    UpdateRoutine(i64),
    DeleteRoutine(i64),
    GetRoutineDetail(i64),
    /// Keyed by exercise name since the ID does not exist yet
    CreateExercise(String),
    UpdateExercise(i64),
    DeleteExercise(i64),
}

#[derive(Debug, Default)]
struct Inner {
    routines: BTreeMap<i64, Routine>,
    exercises: BTreeMap<i64, Exercise>,
    next_id: i64,
    calls: Vec<RemoteCall>,
    failures: Vec<(RemoteCall, RemoteError)>,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Record `call` and consume a scripted failure for it, if any
    fn enter(&mut self, call: RemoteCall) -> RemoteResult<()> {
        self.calls.push(call.clone());
        match self.failures.iter().position(|(c, _)| *c == call) {
            Some(index) => Err(self.failures.remove(index).1),
            None => Ok(()),
        }
    }

    fn ensure_unique_name(&self, name: &str, except: Option<i64>) -> RemoteResult<()> {
        let taken = self
            .routines
            .values()
            .any(|r| r.name == name && Some(r.id) != except);
        if taken {
            return Err(RemoteError::rejected(format!(
                "Ya existe una rutina con el nombre '{name}'"
            )));
        }
        Ok(())
    }

    fn ensure_routine(&self, id: i64) -> RemoteResult<()> {
        if self.routines.contains_key(&id) {
            Ok(())
        } else {
            Err(RemoteError::not_found(format!(
                "No se encontró la rutina con ID {id}"
            )))
        }
    }
}

/// Thread-safe in-memory routine store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `call` fail with a server error
    ///
    /// Each scripted failure fires once; several can be queued for the same
    /// call.
    pub fn fail_on(&self, call: RemoteCall, message: impl Into<String>) {
        self.fail_with(call, RemoteError::server(message));
    }

    /// Make the next `call` fail with `error`
    pub fn fail_with(&self, call: RemoteCall, error: RemoteError) {
        self.inner.lock().failures.push((call, error));
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Stored exercises of a routine, sorted by ID
    pub fn exercises_of(&self, routine_id: i64) -> Vec<Exercise> {
        self.inner
            .lock()
            .exercises
            .values()
            .filter(|e| e.routine_id == routine_id)
            .cloned()
            .collect()
    }

    pub fn routine(&self, id: i64) -> Option<Routine> {
        self.inner.lock().routines.get(&id).cloned()
    }

    /// Insert an exercise row as-is, bypassing payload typing
    ///
    /// Lets tests seed rows the typed payloads cannot produce (no day,
    /// no order).
    pub fn insert_raw(&self, exercise: Exercise) {
        let mut inner = self.inner.lock();
        inner.next_id = inner.next_id.max(exercise.id);
        inner.exercises.insert(exercise.id, exercise);
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn create_routine(&self, payload: &RoutineCreate) -> RemoteResult<Routine> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::CreateRoutine)?;
        inner.ensure_unique_name(&payload.name, None)?;

        let routine = Routine {
            id: inner.allocate_id(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            created_at: Some(Local::now().naive_local()),
        };
        inner.routines.insert(routine.id, routine.clone());
        Ok(routine)
    }

    async fn list_routines(&self) -> RemoteResult<Vec<Routine>> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::ListRoutines)?;
        Ok(inner.routines.values().cloned().collect())
    }

    async fn search_routines(&self, name: &str) -> RemoteResult<Vec<Routine>> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::SearchRoutines(name.to_string()))?;
        let needle = name.to_lowercase();
        Ok(inner
            .routines
            .values()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update_routine(&self, id: i64, payload: &RoutineUpdate) -> RemoteResult<Routine> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::UpdateRoutine(id))?;
        inner.ensure_routine(id)?;
        inner.ensure_unique_name(&payload.name, Some(id))?;

        let Some(routine) = inner.routines.get_mut(&id) else {
            return Err(RemoteError::not_found(format!(
                "No se encontró la rutina con ID {id}"
            )));
        };
        routine.name = payload.name.clone();
        // Absent description leaves the stored one, as the server does
        if let Some(description) = &payload.description {
            routine.description = Some(description.clone());
        }
        Ok(routine.clone())
    }

    async fn delete_routine(&self, id: i64) -> RemoteResult<()> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::DeleteRoutine(id))?;
        inner.ensure_routine(id)?;
        inner.routines.remove(&id);
        inner.exercises.retain(|_, e| e.routine_id != id);
        Ok(())
    }

    async fn get_routine_detail(&self, id: i64) -> RemoteResult<RoutineDetail> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::GetRoutineDetail(id))?;
        let Some(routine) = inner.routines.get(&id).cloned() else {
            return Err(RemoteError::not_found(format!(
                "No se encontró la rutina con ID {id}"
            )));
        };

        let mut rows: Vec<Exercise> = inner
            .exercises
            .values()
            .filter(|e| e.routine_id == id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.day, a.order, a.id).cmp(&(&b.day, b.order, b.id)));

        let mut exercises_by_day: BTreeMap<String, Vec<DayExercise>> = BTreeMap::new();
        for row in &rows {
            let key = row.day.clone().unwrap_or_else(|| UNASSIGNED_DAY.to_string());
            exercises_by_day.entry(key).or_default().push(DayExercise {
                id: row.id,
                name: row.name.clone(),
                series: row.series,
                repetitions: row.repetitions,
                weight: row.weight,
                notes: row.notes.clone(),
                order: row.order,
            });
        }

        Ok(RoutineDetail {
            id: routine.id,
            name: routine.name,
            description: routine.description,
            created_at: routine.created_at,
            exercises_by_day,
            exercises: rows,
        })
    }

    async fn create_exercise(&self, payload: &ExerciseCreate) -> RemoteResult<Exercise> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::CreateExercise(payload.name.clone()))?;
        inner.ensure_routine(payload.routine_id)?;

        let exercise = Exercise {
            id: inner.allocate_id(),
            routine_id: payload.routine_id,
            name: payload.name.clone(),
            day: Some(payload.day.label().to_string()),
            series: Some(payload.series),
            repetitions: Some(payload.repetitions),
            weight: payload.weight,
            notes: payload.notes.clone(),
            order: Some(payload.order),
        };
        inner.exercises.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    async fn update_exercise(&self, id: i64, payload: &ExerciseUpdate) -> RemoteResult<Exercise> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::UpdateExercise(id))?;
        inner.ensure_routine(payload.routine_id)?;

        let Some(exercise) = inner.exercises.get_mut(&id) else {
            return Err(RemoteError::not_found(format!(
                "No se encontró el ejercicio con ID {id}"
            )));
        };
        exercise.routine_id = payload.routine_id;
        exercise.name = payload.name.clone();
        exercise.day = Some(payload.day.label().to_string());
        exercise.series = Some(payload.series);
        exercise.repetitions = Some(payload.repetitions);
        // Absent optional fields keep the stored value
        if let Some(weight) = payload.weight {
            exercise.weight = Some(weight);
        }
        if let Some(notes) = &payload.notes {
            exercise.notes = Some(notes.clone());
        }
        exercise.order = Some(payload.order);
        Ok(exercise.clone())
    }

    async fn delete_exercise(&self, id: i64) -> RemoteResult<()> {
        let mut inner = self.inner.lock();
        inner.enter(RemoteCall::DeleteExercise(id))?;
        if inner.exercises.remove(&id).is_none() {
            return Err(RemoteError::not_found(format!(
                "No se encontró el ejercicio con ID {id}"
            )));
        }
        Ok(())
    }
}
