/*!
 * Weekly rollup mail
 *
 * Sends the last seven days of per-day averages. The mail doubles as a
 * liveness check: it goes out on schedule even when the store has no rows,
 * because "the logger is still running" is the point of the message.
 */

use chrono::{DateTime, Duration, Local};
use std::fmt::Write as _;

use crate::error::Result;
use crate::mail::NotificationChannel;
use crate::store::{DailyAverage, ReadingStore};

const SUMMARY_DAYS: i64 = 7;

/// Sends one scheduled summary over a notification channel
pub trait SummarySender {
    fn send_summary(
        &self,
        store: &dyn ReadingStore,
        channel: &dyn NotificationChannel,
        now: DateTime<Local>,
    ) -> Result<()>;
}

/// Weekly per-day-average report
pub struct WeeklyReport;

impl WeeklyReport {
    fn format_body(averages: &[DailyAverage]) -> String {
        if averages.is_empty() {
            return "No readings were recorded in the last 7 days.\n".to_string();
        }

        let mut body = String::from("Daily averages for the last 7 days:\n\n");
        let _ = writeln!(body, "{:<12} {:>8} {:>10}", "day", "temp C", "humidity %");
        for avg in averages {
            let _ = writeln!(
                body,
                "{:<12} {:>8.1} {:>10.1}",
                avg.day, avg.temperature, avg.humidity
            );
        }
        body
    }
}

impl SummarySender for WeeklyReport {
    fn send_summary(
        &self,
        store: &dyn ReadingStore,
        channel: &dyn NotificationChannel,
        now: DateTime<Local>,
    ) -> Result<()> {
        let since = now - Duration::days(SUMMARY_DAYS);
        let averages = store.daily_averages(since)?;
        let body = Self::format_body(&averages);
        channel.send_warning("hygrolog weekly averages", &body)?;
        Ok(())
    }
}
