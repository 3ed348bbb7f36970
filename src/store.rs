/*!
 * Reading persistence
 *
 * SQLite-backed store for sensor readings, plus the weekly per-day average
 * query and the backup dump used by the scheduled maintenance stages.
 */

use chrono::{DateTime, Local, SecondsFormat};
use rusqlite::{params, Connection};
use std::path::PathBuf;

use crate::config::DatabaseConfig;
use crate::error::{HygroError, Result};
use crate::sensor::SensorReading;

/// Average temperature/humidity for one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverage {
    /// Day in `YYYY-MM-DD` form, local time
    pub day: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// Durable store for sensor readings
pub trait ReadingStore {
    fn persist(&mut self, reading: &SensorReading) -> Result<()>;

    /// Per-day averages for the days since `since`, oldest first
    fn daily_averages(&self, since: DateTime<Local>) -> Result<Vec<DailyAverage>>;

    fn create_backup_dump(&self, now: DateTime<Local>) -> Result<PathBuf>;
}

/// SQLite implementation of [`ReadingStore`]
pub struct SqliteStore {
    conn: Connection,
    backup_dir: PathBuf,
}

impl SqliteStore {
    /// Open (and if necessary create) the database at the configured path
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let conn = Connection::open(&config.path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS readings (
                id          INTEGER PRIMARY KEY,
                recorded_at TEXT NOT NULL,
                temperature REAL NOT NULL,
                humidity    REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_readings_recorded_at
                ON readings (recorded_at);",
        )?;
        Ok(Self {
            conn,
            backup_dir: config.backup_dir.clone(),
        })
    }

    /// In-memory store for tests
    #[cfg(test)]
    pub fn open_in_memory(backup_dir: &std::path::Path) -> Result<Self> {
        Self::open(&DatabaseConfig {
            path: PathBuf::from(":memory:"),
            backup_dir: backup_dir.to_path_buf(),
        })
    }

    pub fn reading_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ReadingStore for SqliteStore {
    fn persist(&mut self, reading: &SensorReading) -> Result<()> {
        self.conn.execute(
            "INSERT INTO readings (recorded_at, temperature, humidity) VALUES (?1, ?2, ?3)",
            params![
                reading
                    .recorded_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                reading.temperature,
                reading.humidity
            ],
        )?;
        Ok(())
    }

    fn daily_averages(&self, since: DateTime<Local>) -> Result<Vec<DailyAverage>> {
        // datetime() folds the stored UTC offsets away so the window cut
        // happens on instants; raw RFC 3339 strings do not order by instant
        // across an offset change
        let mut stmt = self.conn.prepare(
            "SELECT substr(recorded_at, 1, 10) AS day,
                    AVG(temperature),
                    AVG(humidity)
             FROM readings
             WHERE datetime(recorded_at) >= datetime(?1)
             GROUP BY day
             ORDER BY day",
        )?;
        let rows = stmt.query_map(
            params![since.to_rfc3339_opts(SecondsFormat::Secs, true)],
            |row| {
                Ok(DailyAverage {
                    day: row.get(0)?,
                    temperature: row.get(1)?,
                    humidity: row.get(2)?,
                })
            },
        )?;
        let mut averages = Vec::new();
        for row in rows {
            averages.push(row?);
        }
        Ok(averages)
    }

    fn create_backup_dump(&self, now: DateTime<Local>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.backup_dir).map_err(|e| {
            HygroError::BackupDump(format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        let dump_path = self
            .backup_dir
            .join(format!("readings-{}.db", now.format("%Y%m%d-%H%M%S")));
        // VACUUM INTO refuses to overwrite, which is what we want for dumps
        self.conn
            .execute("VACUUM INTO ?1", params![dump_path.to_string_lossy().into_owned()])
            .map_err(|e| {
                HygroError::BackupDump(format!(
                    "Failed to dump database to {}: {}",
                    dump_path.display(),
                    e
                ))
            })?;
        Ok(dump_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn reading_at(ts: DateTime<Local>, temperature: f64, humidity: f64) -> SensorReading {
        SensorReading {
            temperature,
            humidity,
            recorded_at: ts,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_persist_and_count() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory(dir.path()).unwrap();

        store
            .persist(&reading_at(at(2026, 8, 24, 6), 21.5, 48.0))
            .unwrap();
        store
            .persist(&reading_at(at(2026, 8, 24, 18), 22.5, 52.0))
            .unwrap();

        assert_eq!(store.reading_count().unwrap(), 2);
    }

    #[test]
    fn test_daily_averages_groups_by_day() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory(dir.path()).unwrap();

        store
            .persist(&reading_at(at(2026, 8, 24, 6), 20.0, 40.0))
            .unwrap();
        store
            .persist(&reading_at(at(2026, 8, 24, 18), 22.0, 50.0))
            .unwrap();
        store
            .persist(&reading_at(at(2026, 8, 25, 12), 25.0, 60.0))
            .unwrap();

        let averages = store.daily_averages(at(2026, 8, 23, 0)).unwrap();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].day, "2026-08-24");
        assert!((averages[0].temperature - 21.0).abs() < 1e-9);
        assert!((averages[0].humidity - 45.0).abs() < 1e-9);
        assert_eq!(averages[1].day, "2026-08-25");
    }

    #[test]
    fn test_daily_averages_respects_since() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory(dir.path()).unwrap();

        store
            .persist(&reading_at(at(2026, 8, 1, 12), 18.0, 35.0))
            .unwrap();
        store
            .persist(&reading_at(at(2026, 8, 25, 12), 25.0, 60.0))
            .unwrap();

        let averages = store.daily_averages(at(2026, 8, 20, 0)).unwrap();
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].day, "2026-08-25");
    }

    #[test]
    fn test_daily_averages_window_cuts_on_instants() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open_in_memory(dir.path()).unwrap();

        // Rows whose offsets straddle a clock change: string order and
        // instant order disagree for both of them
        store
            .conn
            .execute(
                "INSERT INTO readings (recorded_at, temperature, humidity)
                 VALUES (?1, ?2, ?3), (?4, ?5, ?6)",
                params![
                    "2026-03-29T00:30:00-01:00", // 01:30 UTC, inside the window
                    21.0,
                    50.0,
                    "2026-03-29T02:30:00+02:00", // 00:30 UTC, before it
                    99.0,
                    99.0
                ],
            )
            .unwrap();

        let since =
            DateTime::<Local>::from(Utc.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap());
        let averages = store.daily_averages(since).unwrap();
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].day, "2026-03-29");
        assert!((averages[0].temperature - 21.0).abs() < 1e-9);
        assert!((averages[0].humidity - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_backup_dump_creates_readable_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("readings.db");
        let backup_dir = dir.path().join("dumps");
        let mut store = SqliteStore::open(&DatabaseConfig {
            path: db_path,
            backup_dir: backup_dir.clone(),
        })
        .unwrap();

        store
            .persist(&reading_at(at(2026, 8, 24, 6), 21.5, 48.0))
            .unwrap();

        let dump_path = store.create_backup_dump(at(2026, 8, 30, 4)).unwrap();
        assert!(dump_path.starts_with(&backup_dir));
        assert!(dump_path.exists());

        let dumped = Connection::open(&dump_path).unwrap();
        let count: i64 = dumped
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_backup_dump_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory(dir.path()).unwrap();
        store
            .persist(&reading_at(at(2026, 8, 24, 6), 21.5, 48.0))
            .unwrap();

        let now = at(2026, 8, 30, 4);
        store.create_backup_dump(now).unwrap();
        let err = store.create_backup_dump(now).unwrap_err();
        assert!(matches!(err, HygroError::BackupDump(_)));
    }
}
