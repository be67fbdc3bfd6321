//! Built-in rules.
//!
//! | Identifier | Parameters | Default |
//! |------------|-----------|---------|
//! | `max_consecutive_work_days` | `maxDays` | 6 |
//! | `min_rest_between_shifts` | `minHours` | 11 |
//! | `night_shift_followup` | `nightShift` (id, code, or name) | shift named "Night Duty" |

use super::{param_f64, param_str, param_u32, Rule, RuleContext, RuleFinding};
use crate::models::{RuleParams, ShiftType};

/// Longest run of consecutive working days.
///
/// Days are scanned in ascending order. Only an explicit OFF assignment
/// resets the run; unassigned days are skipped without breaking it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxConsecutiveWorkDays;

impl MaxConsecutiveWorkDays {
    pub const ID: &'static str = "max_consecutive_work_days";
    pub const DEFAULT_MAX_DAYS: u32 = 6;
}

impl Rule for MaxConsecutiveWorkDays {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn label(&self) -> &'static str {
        "Max Consecutive Work Days"
    }

    fn evaluate(&self, context: &RuleContext<'_>, params: &RuleParams) -> Option<RuleFinding> {
        let max_days = param_u32(params, "maxDays", Self::DEFAULT_MAX_DAYS);

        let mut run = 0u32;
        let mut longest = 0u32;
        let mut longest_end = None;
        for (day, shift) in context.days() {
            if context.is_off(shift) {
                run = 0;
                continue;
            }
            run += 1;
            if run > longest {
                longest = run;
                longest_end = Some(day);
            }
        }

        (longest > max_days).then(|| {
            RuleFinding::new(
                longest_end,
                format!(
                    "{} worked {longest} consecutive days (max {max_days})",
                    context.worker_name()
                ),
            )
        })
    }

    fn description(&self) -> &'static str {
        "Limits the longest run of consecutive working days"
    }
}

/// Minimum rest between shifts on adjacent days.
///
/// Rest is the next day's start time minus the current day's end time, both
/// as time of day; a negative difference gets 24 hours added. Reports the
/// first pair below `minHours`. Pairs involving OFF, unknown shift types, or
/// unparsable times are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinRestBetweenShifts;

impl MinRestBetweenShifts {
    pub const ID: &'static str = "min_rest_between_shifts";
    pub const DEFAULT_MIN_HOURS: f64 = 11.0;
}

impl Rule for MinRestBetweenShifts {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn label(&self) -> &'static str {
        "Min Rest Between Shifts"
    }

    fn evaluate(&self, context: &RuleContext<'_>, params: &RuleParams) -> Option<RuleFinding> {
        let min_hours = param_f64(params, "minHours", Self::DEFAULT_MIN_HOURS);
        let min_minutes = (min_hours * 60.0).round() as i64;

        let days = context.days();
        for pair in days.windows(2) {
            let (day, current_id) = pair[0];
            let (next_day, next_id) = pair[1];
            if next_day != day + 1 || context.is_off(current_id) || context.is_off(next_id) {
                continue;
            }
            let (Some(current), Some(next)) =
                (context.shift_type(current_id), context.shift_type(next_id))
            else {
                continue;
            };
            let Some(rest) = rest_minutes(current, next) else {
                continue;
            };
            if rest < min_minutes {
                return Some(RuleFinding::new(
                    Some(day),
                    format!(
                        "{} has only {} rest between {} on day {day} \
                         and {} on day {next_day} (min {min_hours}h)",
                        context.worker_name(),
                        format_minutes(rest),
                        current.name,
                        next.name,
                    ),
                ));
            }
        }
        None
    }

    fn description(&self) -> &'static str {
        "Requires a minimum rest period between consecutive shifts"
    }
}

/// Minutes between the end of `current` and the start of `next` on the following day.
fn rest_minutes(current: &ShiftType, next: &ShiftType) -> Option<i64> {
    let end = current.end()?;
    let start = next.start()?;
    let mut rest = start.signed_duration_since(end).num_minutes();
    if rest < 0 {
        rest += 24 * 60;
    }
    Some(rest)
}

fn format_minutes(minutes: i64) -> String {
    if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    }
}

/// A night shift must be followed by another night shift or OFF.
///
/// The night shift is the catalogue entry matching the `nightShift`
/// parameter (id, code, or name), or else the one named
/// [`NightShiftFollowup::DEFAULT_NIGHT_SHIFT_NAME`]. Without a night shift
/// or an OFF shift in the catalogue the rule never fires. An unassigned
/// following day is not a violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NightShiftFollowup;

impl NightShiftFollowup {
    pub const ID: &'static str = "night_shift_followup";
    pub const DEFAULT_NIGHT_SHIFT_NAME: &'static str = "Night Duty";
}

impl Rule for NightShiftFollowup {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn label(&self) -> &'static str {
        "Night Shift Followup"
    }

    fn evaluate(&self, context: &RuleContext<'_>, params: &RuleParams) -> Option<RuleFinding> {
        let night = match param_str(params, "nightShift") {
            Some(key) => context.catalogue.find(key),
            None => context
                .catalogue
                .all()
                .iter()
                .find(|s| s.name == Self::DEFAULT_NIGHT_SHIFT_NAME),
        }?;
        context.catalogue.off_shift()?;

        for (day, shift) in context.days() {
            if shift != night.id {
                continue;
            }
            let Some(next) = context.shift_on(day + 1) else {
                continue;
            };
            if next != night.id && !context.is_off(next) {
                return Some(RuleFinding::new(
                    Some(day),
                    format!(
                        "{} works {} on day {day} followed by {} on day {}",
                        context.worker_name(),
                        night.name,
                        context.shift_name(next),
                        day + 1
                    ),
                ));
            }
        }
        None
    }

    fn description(&self) -> &'static str {
        "A night shift must be followed by another night shift or a day off"
    }
}
