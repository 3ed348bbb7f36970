/*!
 * Feature-gate schedule predicates
 *
 * Each optional stage (weekly rollup, backup dump) is gated by an enable
 * flag AND a weekday match. The predicates are pure functions of the loaded
 * configuration and an explicit `now`, so one run evaluates them any number
 * of times with the same result and tests pin the clock directly.
 */

use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Day-of-week as it appears in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    #[default]
    Sunday,
}

impl Weekday {
    pub fn matches(self, day: chrono::Weekday) -> bool {
        matches!(
            (self, day),
            (Weekday::Monday, chrono::Weekday::Mon)
                | (Weekday::Tuesday, chrono::Weekday::Tue)
                | (Weekday::Wednesday, chrono::Weekday::Wed)
                | (Weekday::Thursday, chrono::Weekday::Thu)
                | (Weekday::Friday, chrono::Weekday::Fri)
                | (Weekday::Saturday, chrono::Weekday::Sat)
                | (Weekday::Sunday, chrono::Weekday::Sun)
        )
    }
}

/// Whether the weekly-averages rollup should be sent this run
pub fn weekly_averages_due(config: &Config, now: DateTime<Local>) -> bool {
    config.weekly_averages.enabled && config.weekly_averages.weekday.matches(now.weekday())
}

/// Whether a backup dump should be produced this run
pub fn backup_dump_due(config: &Config, now: DateTime<Local>) -> bool {
    config.backup_dump.enabled && config.backup_dump.weekday.matches(now.weekday())
}
