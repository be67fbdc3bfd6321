//! Partial assignment grid threaded through the generation passes.
//!
//! Each pass takes the grid by value and hands it on, so exactly one pass
//! owns it at a time. Slots start empty; `place` overwrites, `fill` only
//! writes empty slots.

use rand::Rng;

use super::new_id;
use crate::models::{day_key, Assignment, DayShifts, Worker};

/// Worker × day grid of optional shift type ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DraftRoster {
    days: u32,
    slots: Vec<Vec<Option<String>>>,
}

impl DraftRoster {
    pub(crate) fn new(workers: usize, days: u32) -> Self {
        Self {
            days,
            slots: vec![vec![None; days as usize]; workers],
        }
    }

    pub(crate) fn workers(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, worker: usize, day: u32) -> Option<&Option<String>> {
        if day == 0 || day > self.days {
            return None;
        }
        self.slots.get(worker)?.get(day as usize - 1)
    }

    fn slot_mut(&mut self, worker: usize, day: u32) -> Option<&mut Option<String>> {
        if day == 0 || day > self.days {
            return None;
        }
        self.slots.get_mut(worker)?.get_mut(day as usize - 1)
    }

    /// Shift on (worker, day), if placed.
    pub(crate) fn get(&self, worker: usize, day: u32) -> Option<&str> {
        self.slot(worker, day)?.as_deref()
    }

    /// Whether (worker, day) exists and is still empty.
    pub(crate) fn is_open(&self, worker: usize, day: u32) -> bool {
        matches!(self.slot(worker, day), Some(None))
    }

    /// Writes a shift, replacing whatever was there.
    pub(crate) fn place(&mut self, worker: usize, day: u32, shift_id: &str) {
        if let Some(slot) = self.slot_mut(worker, day) {
            *slot = Some(shift_id.to_string());
        }
    }

    /// Writes a shift only into an empty slot. Returns whether it was written.
    pub(crate) fn fill(&mut self, worker: usize, day: u32, shift_id: &str) -> bool {
        match self.slot_mut(worker, day) {
            Some(slot) if slot.is_none() => {
                *slot = Some(shift_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Number of workers on `shift_id` on `day`.
    pub(crate) fn count_on(&self, day: u32, shift_id: &str) -> usize {
        (0..self.workers())
            .filter(|&w| self.get(w, day) == Some(shift_id))
            .count()
    }

    fn day_shifts(&self, worker: usize) -> DayShifts {
        self.slots[worker]
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|id| (day_key(i as u32 + 1), id.clone())))
            .collect()
    }

    /// Converts the grid into one assignment per worker, drawing ids from `rng`.
    pub(crate) fn into_assignments<R: Rng>(
        self,
        workers: &[Worker],
        schedule_id: &str,
        rng: &mut R,
    ) -> Vec<Assignment> {
        workers
            .iter()
            .enumerate()
            .map(|(w, worker)| Assignment {
                id: new_id(rng),
                schedule_id: schedule_id.to_string(),
                worker_id: worker.id.clone(),
                shifts: self.day_shifts(w),
            })
            .collect()
    }
}
