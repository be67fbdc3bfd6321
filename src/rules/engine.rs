//! Rule engine.
//!
//! Runs every enabled rule config against a worker's assignments and turns
//! findings into [`Violation`]s carrying the config's penalty.

use tracing::debug;

use super::{RuleCatalogue, RuleContext};
use crate::models::{Assignment, DayShifts, SchedulingRuleConfig, ShiftCatalogue, Violation, Worker};

/// Evaluates configured rules against worker assignments.
///
/// Configs that are disabled are skipped. Configs whose rule cannot be
/// resolved in the catalogue are skipped silently: a typo in a config is
/// inert, not fatal.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    catalogue: RuleCatalogue,
}

impl RuleEngine {
    /// Creates an engine over the built-in rules.
    pub fn new() -> Self {
        Self {
            catalogue: RuleCatalogue::builtin(),
        }
    }

    /// Replaces the rule catalogue.
    pub fn with_catalogue(mut self, catalogue: RuleCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn catalogue(&self) -> &RuleCatalogue {
        &self.catalogue
    }

    /// Validates one worker's day→shift map.
    pub fn validate(
        &self,
        worker: &Worker,
        shifts: &DayShifts,
        catalogue: &ShiftCatalogue,
        configs: &[SchedulingRuleConfig],
    ) -> Vec<Violation> {
        let context = RuleContext::new(worker, shifts, catalogue);

        configs
            .iter()
            .filter(|config| config.is_enabled)
            .filter_map(|config| {
                let Some(rule) = self.catalogue.resolve(config) else {
                    debug!(
                        rule_name = %config.rule_name,
                        rule_id = ?config.rule_id,
                        "no rule implementation for config; skipping"
                    );
                    return None;
                };
                rule.evaluate(&context, &config.parameters)
                    .map(|finding| Violation {
                        rule_id: rule.id().to_string(),
                        rule_name: config.rule_name.clone(),
                        worker_id: worker.id.clone(),
                        day: finding.day,
                        message: finding.message,
                        penalty_score: config.penalty_score,
                    })
            })
            .collect()
    }

    /// Validates every worker that has an assignment, in worker order.
    pub fn validate_assignments(
        &self,
        workers: &[Worker],
        assignments: &[Assignment],
        catalogue: &ShiftCatalogue,
        configs: &[SchedulingRuleConfig],
    ) -> Vec<Violation> {
        workers
            .iter()
            .filter_map(|w| {
                assignments
                    .iter()
                    .find(|a| a.worker_id == w.id)
                    .map(|a| (w, a))
            })
            .flat_map(|(w, a)| self.validate(w, &a.shifts, catalogue, configs))
            .collect()
    }
}
