//! Routine plan files
//!
//! A plan is a JSON document describing a whole routine, used by the
//! `create` command. Keys may be given in English or with the API's
//! Spanish names:
//!
//! ```json
//! {
//!   "nombre": "Torso Pierna",
//!   "descripcion": "4 días",
//!   "ejercicios": [
//!     {"dia": "Lunes", "nombre": "Sentadilla", "series": 4, "repeticiones": 8, "peso": 80}
//!   ]
//! }
//! ```

use anyhow::Context;
use routine_core::{CoreResult, DraftStore, ExerciseFields};
use serde::Deserialize;
use shared::Day;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "ejercicios")]
    pub exercises: Vec<PlanExercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanExercise {
    #[serde(alias = "dia")]
    pub day: Day,
    #[serde(alias = "nombre")]
    pub name: String,
    pub series: u32,
    #[serde(alias = "repeticiones", alias = "reps")]
    pub repetitions: u32,
    #[serde(default, alias = "peso")]
    pub weight: Option<f64>,
    #[serde(default, alias = "notas")]
    pub notes: Option<String>,
}

impl Plan {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid plan file {}", path.display()))
    }

    /// Creation-flow draft holding every exercise of the plan
    ///
    /// Exercises keep file order within each day.
    pub fn into_draft(self) -> CoreResult<DraftStore> {
        let mut draft = DraftStore::new(self.name.clone(), None);
        draft.set_details(self.name, self.description)?;
        for exercise in self.exercises {
            let fields = ExerciseFields {
                name: exercise.name,
                series: exercise.series,
                repetitions: exercise.repetitions,
                weight: exercise.weight,
                notes: exercise.notes,
            };
            draft.add_exercise(exercise.day, fields)?;
        }
        Ok(draft)
    }
}
