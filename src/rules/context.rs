//! Evaluation context passed to rules.

use crate::models::{day_key, sorted_days, DayShifts, ShiftCatalogue, ShiftType, Worker};

/// One worker, that worker's day→shift map, and the shift catalogue.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub worker: &'a Worker,
    pub shifts: &'a DayShifts,
    pub catalogue: &'a ShiftCatalogue,
}

impl<'a> RuleContext<'a> {
    pub fn new(worker: &'a Worker, shifts: &'a DayShifts, catalogue: &'a ShiftCatalogue) -> Self {
        Self {
            worker,
            shifts,
            catalogue,
        }
    }

    /// Assigned days in ascending day-of-month order.
    pub fn days(&self) -> Vec<(u32, &'a str)> {
        sorted_days(self.shifts)
    }

    /// Shift type id assigned on `day`.
    pub fn shift_on(&self, day: u32) -> Option<&'a str> {
        self.shifts.get(&day_key(day)).map(String::as_str)
    }

    /// Catalogue entry for a shift type id.
    pub fn shift_type(&self, id: &str) -> Option<&'a ShiftType> {
        self.catalogue.get(id)
    }

    /// Whether `id` is the OFF shift.
    pub fn is_off(&self, id: &str) -> bool {
        self.catalogue.is_off_id(id)
    }

    /// Display name of a shift type id, or the id itself if unknown.
    pub fn shift_name(&self, id: &'a str) -> &'a str {
        self.shift_type(id).map(|s| s.name.as_str()).unwrap_or(id)
    }

    /// Worker name for messages.
    pub fn worker_name(&self) -> &'a str {
        self.worker.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, ShiftType};

    #[test]
    fn test_context_lookups() {
        let worker = Worker::new("w1").with_name("Ann");
        let catalogue = ShiftCatalogue::default()
            .with_shift(ShiftType::new("d", "Day", "D"))
            .with_shift(ShiftType::off("off"));
        let a = Assignment::new("a", "s", "w1")
            .with_shift(3, "off")
            .with_shift(1, "d")
            .with_shift(2, "ghost");
        let ctx = RuleContext::new(&worker, &a.shifts, &catalogue);

        assert_eq!(ctx.days(), vec![(1, "d"), (2, "ghost"), (3, "off")]);
        assert_eq!(ctx.shift_on(1), Some("d"));
        assert_eq!(ctx.shift_on(4), None);
        assert!(ctx.is_off("off"));
        assert!(!ctx.is_off("ghost"));
        assert_eq!(ctx.shift_name("d"), "Day");
        assert_eq!(ctx.shift_name("ghost"), "ghost");
        assert_eq!(ctx.worker_name(), "Ann");
    }
}
