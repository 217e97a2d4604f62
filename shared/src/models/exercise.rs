//! Exercise Model

use super::day::Day;
use serde::{Deserialize, Serialize};

/// Exercise entity as stored remotely
///
/// The backend keeps most columns nullable, so everything except the
/// identity, parent and name is optional here. The day is kept as the raw
/// label; callers decide how strictly to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    #[serde(rename = "rutina_id")]
    pub routine_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dia", default)]
    pub day: Option<String>,
    #[serde(default)]
    pub series: Option<u32>,
    #[serde(rename = "repeticiones", default)]
    pub repetitions: Option<u32>,
    #[serde(rename = "peso", default)]
    pub weight: Option<f64>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<u32>,
}

/// Exercise entry inside a routine detail's per-day grouping
///
/// The day is the grouping key, so it is not repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayExercise {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub series: Option<u32>,
    #[serde(rename = "repeticiones", default)]
    pub repetitions: Option<u32>,
    #[serde(rename = "peso", default)]
    pub weight: Option<f64>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<u32>,
}

/// Create exercise payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCreate {
    #[serde(rename = "rutina_id")]
    pub routine_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dia")]
    pub day: Day,
    pub series: u32,
    #[serde(rename = "repeticiones")]
    pub repetitions: u32,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
    #[serde(rename = "orden")]
    pub order: u32,
}

/// Update exercise payload
///
/// Always carries the full field set, including the current order index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseUpdate {
    #[serde(rename = "rutina_id")]
    pub routine_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dia")]
    pub day: Day,
    pub series: u32,
    #[serde(rename = "repeticiones")]
    pub repetitions: u32,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
    #[serde(rename = "orden")]
    pub order: u32,
}
