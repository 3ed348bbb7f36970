/*!
 * hygrolog CLI - one scheduled monitoring run per invocation
 *
 * Designed to be driven by cron: no arguments, no interactive input. The
 * exit status distinguishes only "ran" from "could not even bring up
 * logging, configuration, or the store".
 */

use chrono::Local;
use tracing::{error, info};

use hygrolog::mail::{NotificationChannel, SmtpMailer};
use hygrolog::run::{execute_run, RunContext};
use hygrolog::weekly::WeeklyReport;
use hygrolog::{logging, Config, Dht22Sensor, Result, SqliteStore, EXIT_FATAL, EXIT_SUCCESS};

fn main() {
    // Diagnostics must come up first: without them there is nowhere to
    // report anything else, so the only option is stderr and a fatal exit.
    if let Err(e) = logging::init_logging() {
        eprintln!("Logger initialization failed: {}", e.detail());
        std::process::exit(EXIT_FATAL);
    }

    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(category = %e.category(), "{}", e.detail());
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    info!(version = hygrolog::VERSION, "hygrolog execution started");

    // Nothing downstream can run without configuration...
    let config = Config::load()?;

    // ...or without the reading store
    let mut store = SqliteStore::open(&config.database)?;

    // The mail channel is optional: if it fails to come up the run carries
    // on, it just cannot escalate failures by mail
    let mailer = match SmtpMailer::from_config(&config.mail) {
        Ok(mailer) => Some(mailer),
        Err(e) => {
            error!("Mail channel unavailable: {}", e.detail());
            None
        }
    };
    let ctx = RunContext::new(mailer.as_ref().map(|m| m as &dyn NotificationChannel));

    let mut sensor = Dht22Sensor::new(&config.sensor);
    execute_run(
        &config,
        &ctx,
        &mut sensor,
        &mut store,
        &WeeklyReport,
        Local::now(),
    );

    Ok(())
}
