//! Routine Model

use super::exercise::{DayExercise, Exercise};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routine entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Creation timestamp (server local time, no offset)
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Routine with its exercises grouped by day label
///
/// Group keys are raw labels as sent by the server; exercises without a day
/// end up under a placeholder key, which the draft loader rejects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDetail {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "ejercicios_por_dia", default)]
    pub exercises_by_day: BTreeMap<String, Vec<DayExercise>>,
    /// Flat exercise list (same rows, with parent and day columns)
    #[serde(rename = "ejercicios", default)]
    pub exercises: Vec<Exercise>,
}

impl RoutineDetail {
    /// Routine header without the exercises
    pub fn routine(&self) -> Routine {
        Routine {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }

    /// Total number of exercises across all day groups
    pub fn exercise_count(&self) -> usize {
        self.exercises_by_day.values().map(Vec::len).sum()
    }
}

/// Page metadata of a routine listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of `GET /rutinas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutinePage {
    #[serde(rename = "rutinas")]
    pub routines: Vec<Routine>,
    pub pagination: Pagination,
}

/// Create routine payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineCreate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

/// Update routine payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineUpdate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_wire() {
        let json = r#"{
            "id": 4,
            "nombre": "Full Body",
            "descripcion": null,
            "fecha_creacion": "2025-03-01T09:30:00.123456",
            "ejercicios_por_dia": {
                "Lunes": [
                    {"id": 1, "nombre": "Sentadilla", "series": 4, "repeticiones": 8, "peso": 60.0, "notas": null, "orden": 1},
                    {"id": 2, "nombre": "Remo", "series": 3, "repeticiones": 10, "peso": null, "notas": "lento", "orden": 2}
                ],
                "Jueves": [
                    {"id": 3, "nombre": "Dominadas", "series": 3, "repeticiones": 6, "peso": null, "notas": null, "orden": 1}
                ]
            }
        }"#;
        let detail: RoutineDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.name, "Full Body");
        assert!(detail.created_at.is_some());
        assert_eq!(detail.exercise_count(), 3);
        assert_eq!(detail.exercises_by_day["Lunes"][1].notes.as_deref(), Some("lento"));
        assert!(detail.exercises.is_empty());
        assert_eq!(detail.routine().id, 4);
    }

    #[test]
    fn test_page_from_wire() {
        let json = r#"{
            "rutinas": [{"id": 1, "nombre": "Torso", "descripcion": null, "fecha_creacion": null}],
            "pagination": {"page": 1, "limit": 100, "total": 1, "total_pages": 1, "has_next": false, "has_prev": false}
        }"#;
        let page: RoutinePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.routines[0].name, "Torso");
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_update_payload_keeps_null_description() {
        let payload = RoutineUpdate {
            name: "PPL".to_string(),
            description: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["nombre"], "PPL");
        assert!(value.get("descripcion").unwrap().is_null());
    }
}
