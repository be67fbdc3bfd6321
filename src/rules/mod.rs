//! Constraint rules and the rule engine.
//!
//! A [`Rule`] checks one constraint against a single worker's month of
//! assignments. The [`RuleCatalogue`] maps stable rule identifiers to
//! implementations, and the [`RuleEngine`] runs every enabled
//! [`SchedulingRuleConfig`](crate::models::SchedulingRuleConfig) against a
//! worker, turning findings into scored violations.
//!
//! # Usage
//!
//! ```
//! use u_roster::models::{Assignment, SchedulingRuleConfig, ShiftCatalogue, ShiftType, Worker};
//! use u_roster::rules::{builtin, RuleEngine};
//!
//! let shifts = ShiftCatalogue::default()
//!     .with_shift(ShiftType::new("d", "Day", "D").with_times("08:00", "16:00"))
//!     .with_shift(ShiftType::off("off"));
//! let worker = Worker::new("w1").with_name("Ann");
//! let mut assignment = Assignment::new("a1", "s1", "w1");
//! for day in 1..=8 {
//!     assignment.set_shift(day, "d");
//! }
//! let configs = vec![
//!     SchedulingRuleConfig::for_rule(builtin::MaxConsecutiveWorkDays::ID, "Max days")
//!         .with_penalty(-20),
//! ];
//!
//! let violations = RuleEngine::new().validate(&worker, &assignment.shifts, &shifts, &configs);
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].penalty_score, -20);
//! ```

pub mod builtin;
mod catalogue;
mod context;
mod engine;
mod params;

pub use catalogue::RuleCatalogue;
pub use context::RuleContext;
pub use engine::RuleEngine;
pub use params::{param_f64, param_str, param_u32};

use crate::models::RuleParams;
use std::fmt::Debug;

/// What a rule reports when its constraint is not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFinding {
    /// Offending day, when the rule can pin one.
    pub day: Option<u32>,
    /// Human-readable description.
    pub message: String,
}

impl RuleFinding {
    pub fn new(day: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            day,
            message: message.into(),
        }
    }
}

/// A constraint evaluated against one worker's month.
///
/// Implementations must be pure functions of their inputs and must never
/// panic on bad parameters: absent or unparsable values fall back to a
/// documented default.
pub trait Rule: Send + Sync + Debug {
    /// Stable, locale-independent identifier (e.g. `"max_consecutive_work_days"`).
    fn id(&self) -> &'static str;

    /// Display label. Also accepted as a config's `ruleName` for older records.
    fn label(&self) -> &'static str;

    /// Returns a finding if the constraint is violated.
    fn evaluate(&self, context: &RuleContext<'_>, params: &RuleParams) -> Option<RuleFinding>;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.label()
    }
}
