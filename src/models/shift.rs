//! Shift type model and catalogue.
//!
//! A shift type is a named, timed category of work. Exactly one shift type
//! per organization carries the reserved code [`OFF_SHIFT_CODE`] and means
//! "not working".
//!
//! # Time Model
//! Start and end are time-of-day strings (`HH:MM`). An end earlier than the
//! start denotes a shift that runs past midnight. Times are kept as strings
//! because they come from externally authored records; they are parsed on
//! demand and an unparsable value simply yields `None`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Reserved short code of the "not working" shift type.
pub const OFF_SHIFT_CODE: &str = "OFF";

/// A category of work (or non-work).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    /// Unique shift type identifier.
    pub id: String,
    /// Display name (e.g., "Day Shift", "Night Duty").
    pub name: String,
    /// Short code (e.g., "D", "N", "OFF").
    pub code: String,
    /// Start time of day, `HH:MM`.
    pub start_time: String,
    /// End time of day, `HH:MM`. May be earlier than `start_time`.
    pub end_time: String,
    /// Display color. Cosmetic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ShiftType {
    /// Creates a shift type with no times set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            start_time: String::new(),
            end_time: String::new(),
            color: None,
        }
    }

    /// Creates the reserved OFF shift type.
    pub fn off(id: impl Into<String>) -> Self {
        Self::new(id, "Off", OFF_SHIFT_CODE)
    }

    /// Sets start and end times (`HH:MM`).
    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether this is the reserved OFF shift.
    #[inline]
    pub fn is_off(&self) -> bool {
        self.code == OFF_SHIFT_CODE
    }

    /// Parsed start time.
    pub fn start(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.start_time)
    }

    /// Parsed end time.
    pub fn end(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.end_time)
    }

    /// Whether the shift ends on the following calendar day.
    pub fn crosses_midnight(&self) -> bool {
        matches!((self.start(), self.end()), (Some(s), Some(e)) if e < s)
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// The shift types available to one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCatalogue {
    shifts: Vec<ShiftType>,
}

impl ShiftCatalogue {
    /// Creates a catalogue from a list of shift types.
    pub fn new(shifts: Vec<ShiftType>) -> Self {
        Self { shifts }
    }

    /// Adds a shift type.
    pub fn with_shift(mut self, shift: ShiftType) -> Self {
        self.shifts.push(shift);
        self
    }

    /// All shift types, in catalogue order.
    pub fn all(&self) -> &[ShiftType] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Finds a shift type by id.
    pub fn get(&self, id: &str) -> Option<&ShiftType> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Whether a shift type with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The reserved OFF shift type (first match).
    pub fn off_shift(&self) -> Option<&ShiftType> {
        self.shifts.iter().find(|s| s.is_off())
    }

    /// Whether `id` refers to an OFF shift type.
    pub fn is_off_id(&self, id: &str) -> bool {
        self.get(id).is_some_and(ShiftType::is_off)
    }

    /// Shift types that are not OFF.
    pub fn work_shifts(&self) -> impl Iterator<Item = &ShiftType> {
        self.shifts.iter().filter(|s| !s.is_off())
    }

    /// Finds a shift type whose id, code, or name equals `key`.
    pub fn find(&self, key: &str) -> Option<&ShiftType> {
        self.get(key).or_else(|| {
            self.shifts
                .iter()
                .find(|s| s.code == key || s.name == key)
        })
    }
}

impl FromIterator<ShiftType> for ShiftCatalogue {
    fn from_iter<I: IntoIterator<Item = ShiftType>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
