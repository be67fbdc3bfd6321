//! Rostering domain models.
//!
//! Plain data supplied by (and handed back to) the persistence layer.
//! Store-facing records serialize with camelCase field names.
//!
//! | Type | Role |
//! |------|------|
//! | `Worker` | Person being rostered |
//! | `ShiftType` / `ShiftCatalogue` | Timed work categories, plus the reserved OFF type |
//! | `Request` | Approved leave or shift preference |
//! | `SchedulingRuleConfig` | Parameterized activation of a built-in rule |
//! | `ManpowerPlan` | Daily headcount targets per shift type |
//! | `Schedule` / `Assignment` | Generation result |
//! | `LeaseState` | Scheduler lease fields on a group |

mod lease;
mod manpower;
mod month;
mod request;
mod rule_config;
mod schedule;
mod shift;
mod worker;

pub use lease::{GroupKey, LeaseState};
pub use manpower::{DailyRequirement, ManpowerPlan};
pub use month::{day_key, parse_day_key, YearMonth};
pub use request::{Request, RequestStatus, RequestType};
pub use rule_config::{RuleParams, RuleType, SchedulingRuleConfig};
pub use schedule::{
    sorted_days, total_penalty, Assignment, DayShifts, Schedule, ScheduleStatus, Violation,
    FAILED_SCORE,
};
pub use shift::{parse_time_of_day, ShiftCatalogue, ShiftType, OFF_SHIFT_CODE};
pub use worker::Worker;
