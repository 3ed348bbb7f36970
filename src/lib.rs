/*!
 * hygrolog - scheduled temperature/humidity logging
 *
 * A cron-invoked monitoring run:
 * - Reads a DHT22-class sensor and persists the reading to SQLite
 * - Mails a weekly per-day-average rollup as a liveness check
 * - Produces scheduled database backup dumps
 * - Contains every stage failure at its own boundary, with best-effort
 *   warning mails for unattended operation
 */

pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod run;
pub mod schedule;
pub mod sensor;
pub mod store;
pub mod weekly;

// Re-export commonly used types
pub use config::Config;
pub use error::{HygroError, Result, EXIT_FATAL, EXIT_SUCCESS};
pub use run::{execute_run, RunContext, RunOutcome, StageStatus};
pub use sensor::{Dht22Sensor, SensorReading, SensorSource};
pub use store::{ReadingStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
