/*!
 * The monitoring run orchestrator
 *
 * One invocation walks a fixed, forward-only stage sequence: acquire and
 * persist a reading, send the weekly rollup if it is due, produce a backup
 * dump if it is due, log a completion marker. Every stage is its own
 * failure domain: an error is logged where it happens, escalated by mail at
 * most once if a channel is available, and never allowed to stop the stages
 * behind it. The fatal init stages (diagnostics, configuration, store) live
 * in main; by the time `execute_run` is called the run always reaches its
 * completion marker.
 */

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::mail::NotificationChannel;
use crate::schedule::{backup_dump_due, weekly_averages_due};
use crate::sensor::SensorSource;
use crate::store::ReadingStore;
use crate::weekly::SummarySender;

/// Per-run context derived once during init and passed to every stage.
///
/// Whether the mail channel came up is decided exactly once, at construction
/// time; the soft stages consult this field rather than re-deriving it.
pub struct RunContext<'a> {
    pub channel: Option<&'a dyn NotificationChannel>,
}

impl<'a> RunContext<'a> {
    pub fn new(channel: Option<&'a dyn NotificationChannel>) -> Self {
        Self { channel }
    }
}

/// Outcome of one soft stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Succeeded,
    /// The stage ran and failed; the failure was contained at its boundary
    Failed,
    /// A precondition (gate or channel availability) was unmet; not attempted
    Skipped,
}

/// Accumulated per-stage states for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub measurement: StageStatus,
    pub weekly: StageStatus,
    pub backup: StageStatus,
}

/// Run one stage: attempt, on failure log with full detail, then escalate
/// by mail at most once. A failed escalation is logged and dropped, never
/// escalated again.
fn attempt_stage<F>(ctx: &RunContext, stage: &'static str, f: F) -> StageStatus
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => StageStatus::Succeeded,
        Err(e) => {
            error!(stage, category = %e.category(), "{}", e.detail());
            if let Some(channel) = ctx.channel {
                let subject = format!("hygrolog: {} failed", stage);
                let body = format!(
                    "Stage {:?} failed.\n\n{}\n\nCheck the hygrolog log for details.",
                    stage,
                    e.detail()
                );
                if let Err(mail_err) = channel.send_warning(&subject, &body) {
                    error!(stage, "Failed to send warning mail: {}", mail_err.detail());
                }
            }
            StageStatus::Failed
        }
    }
}

/// Execute the soft stages of one monitoring run.
///
/// Never returns an error: each stage failure is contained, and the
/// completion marker is logged no matter which combination of stages failed.
pub fn execute_run(
    config: &Config,
    ctx: &RunContext,
    sensor: &mut dyn SensorSource,
    store: &mut dyn ReadingStore,
    summary: &dyn SummarySender,
    now: DateTime<Local>,
) -> RunOutcome {
    // Stage: acquire one reading and persist it
    let measurement = attempt_stage(ctx, "sensor data handling", || {
        let reading = sensor.read()?;
        store.persist(&reading)?;
        info!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            "Reading persisted"
        );
        Ok(())
    });

    // Stage: weekly rollup, reachable only with a working mail channel
    let weekly = match ctx.channel {
        None => {
            info!("Mail channel unavailable, skipping weekly averages");
            StageStatus::Skipped
        }
        Some(_) if !weekly_averages_due(config, now) => {
            info!("Weekly averages not due");
            StageStatus::Skipped
        }
        Some(channel) => attempt_stage(ctx, "weekly averages", || {
            summary.send_summary(&*store, channel, now)
        }),
    };

    // Stage: backup dump, gated only by its schedule
    let backup = if !backup_dump_due(config, now) {
        info!("Backup dump not due");
        StageStatus::Skipped
    } else {
        attempt_stage(ctx, "backup dump", || {
            info!("Starting backup dump");
            let dump_path = store.create_backup_dump(now)?;
            info!(path = %dump_path.display(), "Backup dump finished");
            Ok(())
        })
    };

    info!("hygrolog run finished");

    RunOutcome {
        measurement,
        weekly,
        backup,
    }
}
