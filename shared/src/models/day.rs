//! Day Model
//!
//! The seven canonical weekday labels. `Ord` follows the week starting on
//! Monday, which is the order grouped views are projected in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Day of the week an exercise is scheduled on
///
/// Serialized as the wire label (`"Lunes"`, `"Martes"`, ...). Parsing is
/// lenient: accents, letter case and English names are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Label that is not one of the seven canonical days
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid day label: '{0}'")]
pub struct DayParseError(pub String);

impl Day {
    /// All days in week order
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Wire label used by the remote store
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Lunes",
            Self::Tuesday => "Martes",
            Self::Wednesday => "Miércoles",
            Self::Thursday => "Jueves",
            Self::Friday => "Viernes",
            Self::Saturday => "Sábado",
            Self::Sunday => "Domingo",
        }
    }

    /// English name, for display
    pub const fn english_name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Zero-based position in the week (Monday = 0)
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Day {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                _ => c,
            })
            .collect();

        match normalized.as_str() {
            "lunes" | "monday" => Ok(Self::Monday),
            "martes" | "tuesday" => Ok(Self::Tuesday),
            "miercoles" | "wednesday" => Ok(Self::Wednesday),
            "jueves" | "thursday" => Ok(Self::Thursday),
            "viernes" | "friday" => Ok(Self::Friday),
            "sabado" | "saturday" => Ok(Self::Saturday),
            "domingo" | "sunday" => Ok(Self::Sunday),
            _ => Err(DayParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Day {
    type Error = DayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Day> for &'static str {
    fn from(day: Day) -> Self {
        day.label()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
