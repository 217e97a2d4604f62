//! Terminal rendering

use routine_core::{ChangeSet, DraftExercise, DraftStore, RoutineStats, SubmitReport};
use serde::Serialize;
use shared::Routine;
use std::fmt::Write;

#[derive(Serialize)]
struct DayView<'a> {
    day: &'static str,
    exercises: Vec<&'a DraftExercise>,
}

#[derive(Serialize)]
struct RoutineView<'a> {
    id: Option<i64>,
    name: &'a str,
    description: Option<&'a str>,
    days: Vec<DayView<'a>>,
}

/// Day-grouped routine as JSON (days in week order, keyed by wire label)
pub fn routine_json(draft: &DraftStore) -> serde_json::Result<String> {
    let header = draft.header();
    let view = RoutineView {
        id: header.id,
        name: &header.name,
        description: header.description.as_deref(),
        days: draft
            .grouped()
            .into_iter()
            .map(|(day, exercises)| DayView {
                day: day.label(),
                exercises,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&view)
}

fn exercise_line(entry: &DraftExercise) -> String {
    let mut line = format!(
        "  {:>2}. [{}] {} {}x{}",
        entry.order, entry.id, entry.name, entry.series, entry.repetitions
    );
    if let Some(weight) = entry.weight {
        let _ = write!(line, " @ {weight} kg");
    }
    if let Some(notes) = &entry.notes {
        let _ = write!(line, " ({notes})");
    }
    line
}

/// Day-grouped routine as plain text
pub fn routine_text(draft: &DraftStore) -> String {
    let header = draft.header();
    let mut out = match header.id {
        Some(id) => format!("#{id} {}\n", header.name),
        None => format!("{} (unsaved)\n", header.name),
    };
    if let Some(description) = &header.description {
        let _ = writeln!(out, "{description}");
    }
    let grouped = draft.grouped();
    if grouped.is_empty() {
        out.push_str("  (no exercises)\n");
    }
    for (day, entries) in grouped {
        let _ = writeln!(out, "{day}");
        for entry in entries {
            let _ = writeln!(out, "{}", exercise_line(entry));
        }
    }
    out
}

/// One routine per line, `#id name`
pub fn routines_text(routines: &[Routine]) -> String {
    if routines.is_empty() {
        return "No routines\n".to_string();
    }
    let mut out = String::new();
    for routine in routines {
        let _ = write!(out, "#{} {}", routine.id, routine.name);
        if let Some(description) = routine.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, " - {description}");
        }
        out.push('\n');
    }
    out
}

pub fn stats_text(stats: &RoutineStats) -> String {
    let mut out = format!(
        "Exercises: {}\nSeries: {}\n",
        stats.total_exercises, stats.total_series
    );
    for (day, count) in &stats.per_day {
        let _ = writeln!(out, "  {day}: {count}");
    }
    if let Some(day) = stats.busiest_day {
        let _ = writeln!(out, "Busiest day: {day}");
    }
    out
}

pub fn report_text(report: &SubmitReport) -> String {
    format!(
        "Saved routine #{} ({} created, {} updated, {} deleted)",
        report.routine_id, report.created, report.updated, report.deleted
    )
}

/// One line per pending operation
pub fn changes_text(set: &ChangeSet) -> String {
    if set.is_empty() {
        return "No pending changes".to_string();
    }
    let mut out = String::new();
    for entry in &set.creations {
        let _ = writeln!(out, "+ {} ({})", entry.name, entry.day);
    }
    for change in &set.updates {
        let fields: Vec<&str> = change.changes.iter().map(|c| c.field.as_str()).collect();
        let _ = writeln!(out, "~ [{}] {}: {}", change.id, change.exercise.name, fields.join(", "));
    }
    for entry in &set.deletions {
        let _ = writeln!(out, "- [{}] {}", entry.id, entry.name);
    }
    out
}
