/*!
 * Sensor acquisition
 *
 * The production source is a DHT22-class sensor exposed through sysfs/hwmon
 * channel files: one integer file per channel, millidegrees Celsius for
 * temperature and milli-percent for relative humidity.
 */

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::config::SensorConfig;
use crate::error::{HygroError, Result};

/// DHT22 operating range in degrees Celsius
const TEMP_RANGE_C: (f64, f64) = (-40.0, 80.0);

/// Relative humidity range in percent
const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// One captured sensor reading
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
    /// Capture time, set when the reading is taken
    pub recorded_at: DateTime<Local>,
}

/// A source of one reading per invocation
pub trait SensorSource {
    fn read(&mut self) -> Result<SensorReading>;
}

/// DHT22 adapter over per-channel sysfs files
pub struct Dht22Sensor {
    temperature_path: PathBuf,
    humidity_path: PathBuf,
}

impl Dht22Sensor {
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            temperature_path: config.temperature_path.clone(),
            humidity_path: config.humidity_path.clone(),
        }
    }

    /// Read one milli-unit integer channel file and scale to the base unit
    fn read_channel(path: &Path) -> Result<f64> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HygroError::Sensor(format!("Failed to read channel {}: {}", path.display(), e))
        })?;
        let millis: i64 = raw.trim().parse().map_err(|_| {
            HygroError::Sensor(format!(
                "Channel {} yielded non-numeric value {:?}",
                path.display(),
                raw.trim()
            ))
        })?;
        Ok(millis as f64 / 1000.0)
    }
}

impl SensorSource for Dht22Sensor {
    fn read(&mut self) -> Result<SensorReading> {
        let temperature = Self::read_channel(&self.temperature_path)?;
        let humidity = Self::read_channel(&self.humidity_path)?;

        // A wedged DHT22 tends to report out-of-range garbage rather than
        // failing outright; reject it here instead of persisting it.
        if temperature < TEMP_RANGE_C.0 || temperature > TEMP_RANGE_C.1 {
            return Err(HygroError::Sensor(format!(
                "Temperature {:.1} C outside sensor range",
                temperature
            )));
        }
        if humidity < HUMIDITY_RANGE_PCT.0 || humidity > HUMIDITY_RANGE_PCT.1 {
            return Err(HygroError::Sensor(format!(
                "Humidity {:.1} % outside sensor range",
                humidity
            )));
        }

        Ok(SensorReading {
            temperature,
            humidity,
            recorded_at: Local::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sensor_over(dir: &Path, temp: &str, humidity: &str) -> Dht22Sensor {
        let temperature_path = dir.join("temp1_input");
        let humidity_path = dir.join("humidity1_input");
        std::fs::write(&temperature_path, temp).unwrap();
        std::fs::write(&humidity_path, humidity).unwrap();
        Dht22Sensor::new(&SensorConfig {
            temperature_path,
            humidity_path,
        })
    }

    #[test]
    fn test_reads_and_scales_channels() {
        let dir = tempdir().unwrap();
        let mut sensor = sensor_over(dir.path(), "21500\n", "48200\n");

        let reading = sensor.read().unwrap();
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.humidity, 48.2);
    }

    #[test]
    fn test_negative_temperature() {
        let dir = tempdir().unwrap();
        let mut sensor = sensor_over(dir.path(), "-12250\n", "80000\n");

        let reading = sensor.read().unwrap();
        assert_eq!(reading.temperature, -12.25);
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let dir = tempdir().unwrap();
        let mut sensor = sensor_over(dir.path(), "85000\n", "50000\n");

        let err = sensor.read().unwrap_err();
        assert!(matches!(err, HygroError::Sensor(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_out_of_range_humidity_rejected() {
        let dir = tempdir().unwrap();
        let mut sensor = sensor_over(dir.path(), "20000\n", "101000\n");

        assert!(matches!(sensor.read(), Err(HygroError::Sensor(_))));
    }

    #[test]
    fn test_garbage_channel_value_rejected() {
        let dir = tempdir().unwrap();
        let mut sensor = sensor_over(dir.path(), "not-a-number\n", "50000\n");

        assert!(matches!(sensor.read(), Err(HygroError::Sensor(_))));
    }

    #[test]
    fn test_missing_channel_file() {
        let dir = tempdir().unwrap();
        let mut sensor = Dht22Sensor::new(&SensorConfig {
            temperature_path: dir.path().join("missing"),
            humidity_path: dir.path().join("also-missing"),
        });

        assert!(matches!(sensor.read(), Err(HygroError::Sensor(_))));
    }
}
