//! Registry of rule implementations.

use std::sync::Arc;

use super::builtin::{MaxConsecutiveWorkDays, MinRestBetweenShifts, NightShiftFollowup};
use super::Rule;
use crate::models::SchedulingRuleConfig;

/// Maps stable rule identifiers to implementations.
///
/// # Resolution
/// A config with a `ruleId` resolves by identifier only. A config without
/// one (older records) resolves its `ruleName` first as an identifier, then
/// against the display labels. Unresolvable configs yield `None`.
#[derive(Clone)]
pub struct RuleCatalogue {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleCatalogue {
    /// A catalogue with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules.
    pub fn builtin() -> Self {
        Self::empty()
            .with_rule(MaxConsecutiveWorkDays)
            .with_rule(MinRestBetweenShifts)
            .with_rule(NightShiftFollowup)
    }

    /// Registers a rule, replacing any rule with the same identifier.
    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.retain(|r| r.id() != rule.id());
        self.rules.push(Arc::new(rule));
        self
    }

    /// Looks up a rule by identifier.
    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| &**r)
    }

    /// Resolves a config to its implementation.
    pub fn resolve(&self, config: &SchedulingRuleConfig) -> Option<&dyn Rule> {
        if let Some(id) = config.rule_id.as_deref() {
            return self.get(id);
        }
        let name = config.rule_name.trim();
        self.get(name).or_else(|| {
            self.rules
                .iter()
                .find(|r| r.label() == name)
                .map(|r| &**r)
        })
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.id())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for RuleCatalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCatalogue")
            .field("rules", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleParams;
    use crate::rules::{RuleContext, RuleFinding};

    #[derive(Debug)]
    struct AlwaysFires;

    impl Rule for AlwaysFires {
        fn id(&self) -> &'static str {
            "always_fires"
        }

        fn label(&self) -> &'static str {
            "Always Fires"
        }

        fn evaluate(
            &self,
            _context: &RuleContext<'_>,
            _params: &RuleParams,
        ) -> Option<RuleFinding> {
            Some(RuleFinding::new(None, "fired"))
        }
    }

    #[test]
    fn test_builtin_ids() {
        let c = RuleCatalogue::builtin();
        assert_eq!(
            c.ids().collect::<Vec<_>>(),
            vec![
                "max_consecutive_work_days",
                "min_rest_between_shifts",
                "night_shift_followup"
            ]
        );
    }

    #[test]
    fn test_resolve_by_rule_id() {
        let c = RuleCatalogue::builtin();
        let config = SchedulingRuleConfig::for_rule("min_rest_between_shifts", "Whatever label");
        assert_eq!(c.resolve(&config).unwrap().id(), "min_rest_between_shifts");
    }

    #[test]
    fn test_rule_id_is_authoritative() {
        let c = RuleCatalogue::builtin();
        // Label matches a rule, but the explicit id does not
        let config = SchedulingRuleConfig::for_rule("retired_rule", "Max Consecutive Work Days");
        assert!(c.resolve(&config).is_none());
    }

    #[test]
    fn test_resolve_legacy_name() {
        let c = RuleCatalogue::builtin();
        let by_label = SchedulingRuleConfig::new("Night Shift Followup");
        assert_eq!(c.resolve(&by_label).unwrap().id(), "night_shift_followup");
        let by_id = SchedulingRuleConfig::new("night_shift_followup");
        assert_eq!(c.resolve(&by_id).unwrap().id(), "night_shift_followup");
    }

    #[test]
    fn test_unknown_name() {
        let c = RuleCatalogue::builtin();
        assert!(c.resolve(&SchedulingRuleConfig::new("Max Consecutive Workdays")).is_none());
    }

    #[test]
    fn test_custom_rule() {
        let c = RuleCatalogue::builtin().with_rule(AlwaysFires);
        assert_eq!(c.len(), 4);
        assert!(c.get("always_fires").is_some());

        let c = c.with_rule(AlwaysFires);
        assert_eq!(c.len(), 4);
    }
}
