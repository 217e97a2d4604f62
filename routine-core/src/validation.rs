//! Input validation helpers
//!
//! Text limits follow the remote schema: names are stored in a 255-char
//! column; notes and descriptions get the usual free-text cap.
//! Every check runs so the caller sees all violated fields at once.

use crate::types::ExerciseFields;
use std::fmt;

// ── Text length limits ──────────────────────────────────────────────

/// Routine and exercise names
pub const MAX_NAME_LEN: usize = 255;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Field input rejected before reaching the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Names of the violated fields, in check order
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "Validation failed: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: String) {
        self.0.push(FieldViolation { field, message });
    }

    fn required_text(&mut self, value: &str, field: &'static str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, format!("{field} must not be empty"));
        } else if value.chars().count() > max_len {
            self.push(
                field,
                format!("{field} is too long ({} chars, max {max_len})", value.chars().count()),
            );
        }
    }

    fn optional_text(&mut self, value: Option<&str>, field: &'static str, max_len: usize) {
        if let Some(v) = value
            && v.chars().count() > max_len
        {
            self.push(
                field,
                format!("{field} is too long ({} chars, max {max_len})", v.chars().count()),
            );
        }
    }

    fn positive(&mut self, value: u32, field: &'static str) {
        if value == 0 {
            self.push(field, format!("{field} must be a positive number"));
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

/// Validate exercise fields (name, series ≥ 1, repetitions ≥ 1, weight ≥ 0)
pub fn validate_exercise(fields: &ExerciseFields) -> Result<(), ValidationError> {
    let mut violations = Violations::default();
    violations.required_text(&fields.name, "name", MAX_NAME_LEN);
    violations.positive(fields.series, "series");
    violations.positive(fields.repetitions, "repetitions");
    if let Some(weight) = fields.weight
        && !(weight.is_finite() && weight >= 0.0)
    {
        violations.push("weight", "weight must be a non-negative number".to_string());
    }
    violations.optional_text(fields.notes.as_deref(), "notes", MAX_NOTE_LEN);
    violations.finish()
}

/// Validate routine header fields
pub fn validate_routine(name: &str, description: Option<&str>) -> Result<(), ValidationError> {
    let mut violations = Violations::default();
    violations.required_text(name, "name", MAX_NAME_LEN);
    violations.optional_text(description, "description", MAX_NOTE_LEN);
    violations.finish()
}
