//! Persistence contract for roster data.
//!
//! Generation reads everything it needs through [`RosterSource`] and writes
//! one schedule with its assignments through [`ScheduleSink`] as a single
//! batch. [`InMemoryRosterStore`] implements both for tests and embedding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::generator::GenerationInput;
use crate::models::{Assignment, GroupKey, Schedule, YearMonth};

/// Supplies generation input for a group and month.
pub trait RosterSource: Send + Sync {
    fn load_input(&self, key: &GroupKey, month: YearMonth) -> Result<GenerationInput, StoreError>;
}

/// Persists a schedule and its assignments.
///
/// Readers must never observe part of a batch.
pub trait ScheduleSink: Send + Sync {
    fn save_batch(&self, schedule: &Schedule, assignments: &[Assignment]) -> Result<(), StoreError>;
}

/// A persisted schedule together with its assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSchedule {
    pub schedule: Schedule,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Default)]
struct Tables {
    inputs: HashMap<(GroupKey, YearMonth), GenerationInput>,
    schedules: HashMap<String, SavedSchedule>,
}

/// Process-local roster store. One lock guards every table.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    tables: Mutex<Tables>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an input under its own group and month.
    pub fn put_input(&self, input: GenerationInput) -> Result<(), StoreError> {
        let key = (input.group_key(), input.month);
        self.lock()?.inputs.insert(key, input);
        Ok(())
    }

    /// A saved schedule by id.
    pub fn schedule(&self, schedule_id: &str) -> Result<Option<SavedSchedule>, StoreError> {
        Ok(self.lock()?.schedules.get(schedule_id).cloned())
    }

    /// Saved schedules of a group and month, newest first.
    pub fn schedules_for(
        &self,
        key: &GroupKey,
        month: YearMonth,
    ) -> Result<Vec<SavedSchedule>, StoreError> {
        let tables = self.lock()?;
        let mut found: Vec<SavedSchedule> = tables
            .schedules
            .values()
            .filter(|s| {
                s.schedule.organization_id == key.organization_id
                    && s.schedule.group_id == key.group_id
                    && s.schedule.month == month
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.schedule
                .generated_at
                .cmp(&a.schedule.generated_at)
                .then_with(|| a.schedule.id.cmp(&b.schedule.id))
        });
        Ok(found)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("roster store lock poisoned".into()))
    }
}

impl RosterSource for InMemoryRosterStore {
    fn load_input(&self, key: &GroupKey, month: YearMonth) -> Result<GenerationInput, StoreError> {
        self.lock()?
            .inputs
            .get(&(key.clone(), month))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("roster input for {key} {month}")))
    }
}

impl ScheduleSink for InMemoryRosterStore {
    fn save_batch(
        &self,
        schedule: &Schedule,
        assignments: &[Assignment],
    ) -> Result<(), StoreError> {
        if let Some(stray) = assignments.iter().find(|a| a.schedule_id != schedule.id) {
            return Err(StoreError::Conflict(format!(
                "assignment {} belongs to schedule {}, not {}",
                stray.id, stray.schedule_id, schedule.id
            )));
        }
        self.lock()?.schedules.insert(
            schedule.id.clone(),
            SavedSchedule {
                schedule: schedule.clone(),
                assignments: assignments.to_vec(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn month() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn schedule(id: &str, minutes: i64) -> Schedule {
        Schedule {
            id: id.into(),
            organization_id: "org".into(),
            group_id: "grp".into(),
            month: month(),
            status: ScheduleStatus::Draft,
            generated_at: Utc.with_ymd_and_hms(2024, 2, 20, 8, 0, 0).unwrap()
                + Duration::minutes(minutes),
            total_score: 0,
            violated_rules: Vec::new(),
        }
    }

    #[test]
    fn test_input_roundtrip() {
        let store = InMemoryRosterStore::new();
        let key = GroupKey::new("org", "grp");
        assert!(matches!(
            store.load_input(&key, month()),
            Err(StoreError::NotFound(_))
        ));

        store
            .put_input(GenerationInput::new("org", "grp", month()))
            .unwrap();
        assert_eq!(store.load_input(&key, month()).unwrap().month, month());
    }

    #[test]
    fn test_batch_saved_whole() {
        let store = InMemoryRosterStore::new();
        let s = schedule("s1", 0);
        let assignments = vec![
            Assignment::new("a1", "s1", "w1").with_shift(1, "d"),
            Assignment::new("a2", "s1", "w2").with_shift(1, "off"),
        ];
        store.save_batch(&s, &assignments).unwrap();

        let saved = store.schedule("s1").unwrap().unwrap();
        assert_eq!(saved.schedule, s);
        assert_eq!(saved.assignments, assignments);
    }

    #[test]
    fn test_batch_with_foreign_assignment_rejected() {
        let store = InMemoryRosterStore::new();
        let assignments = vec![
            Assignment::new("a1", "s1", "w1"),
            Assignment::new("a2", "other", "w2"),
        ];
        assert!(matches!(
            store.save_batch(&schedule("s1", 0), &assignments),
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.schedule("s1").unwrap(), None);
    }

    #[test]
    fn test_schedules_for_newest_first() {
        let store = InMemoryRosterStore::new();
        store.save_batch(&schedule("old", 0), &[]).unwrap();
        store.save_batch(&schedule("new", 5), &[]).unwrap();

        let found = store
            .schedules_for(&GroupKey::new("org", "grp"), month())
            .unwrap();
        let ids: Vec<_> = found.iter().map(|s| s.schedule.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
