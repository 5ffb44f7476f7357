//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the runtime and its collaborators.
//!
//! Config is used in three places:
//! 1. **Runtime creation**: `Runtime::builder(config)` (driver poll interval)
//! 2. **Clock producer**: tick period, UTC offset, time servers
//! 3. **Display listener**: daytime window and I2C settings
//!
//! None of it reaches the dispatch core: the queue and dispatcher take no configuration.
//!
//! ## Sentinel values
//! - `poll_interval = 0s` → [`DEFAULT_POLL_INTERVAL`]
//! - `tick = 0s` → [`DEFAULT_TICK`]

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

/// Driver sleep between drains when `poll_interval` is zero.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Clock sampling period when `tick` is zero.
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// I2C settings for the clock display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct I2cConfig {
    /// Controller port number.
    pub port: u8,
    /// 7-bit device address of the display driver.
    pub address: u8,
    /// Data line GPIO.
    pub sda_pin: u8,
    /// Clock line GPIO.
    pub scl_pin: u8,
    /// Bus speed in hertz.
    pub speed_hz: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            port: 0,
            address: 0x70,
            sda_pin: 33,
            scl_pin: 32,
            speed_hz: 400_000,
        }
    }
}

/// Global configuration for the runtime.
///
/// ## Field semantics
/// - `poll_interval`: Driver sleep after the queue runs empty (`0s` = default)
/// - `tick`: How often the clock producer samples the time source (`0s` = default)
/// - `utc_offset_secs`: Local offset east of UTC, in seconds
/// - `time_servers`: Time servers the clock source is configured with
/// - `day_start_hour`/`day_end_hour`: Inclusive local-hour window for full brightness
/// - `twelve_hour`: Render hours modulo 12 (noon and midnight show ` 0`)
/// - `i2c`: Display bus settings
#[derive(Clone, Debug)]
pub struct Config {
    /// Sleep between drains of the event queue.
    pub poll_interval: Duration,

    /// Clock sampling period.
    pub tick: Duration,

    /// Offset east of UTC in seconds. Out-of-range values fall back to UTC.
    pub utc_offset_secs: i32,

    /// Time servers, reported in [`SyncEvent`](crate::SyncEvent).
    pub time_servers: Vec<String>,

    /// First local hour (inclusive) with full display brightness.
    pub day_start_hour: u32,

    /// Last local hour (inclusive) with full display brightness.
    pub day_end_hour: u32,

    /// Render hours as 0..=11 (with a blank leading digit) instead of 0..=23.
    pub twelve_hour: bool,

    /// Display bus settings.
    pub i2c: I2cConfig,
}

impl Config {
    /// Returns the driver poll interval, substituting the default for zero.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval == Duration::ZERO {
            DEFAULT_POLL_INTERVAL
        } else {
            self.poll_interval
        }
    }

    /// Returns the clock tick, substituting the default for zero.
    #[inline]
    pub fn tick(&self) -> Duration {
        if self.tick == Duration::ZERO {
            DEFAULT_TICK
        } else {
            self.tick
        }
    }

    /// Returns the configured local offset (UTC if out of range).
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// True if `hour` falls in the full-brightness window.
    #[inline]
    pub fn is_daytime(&self, hour: u32) -> bool {
        (self.day_start_hour..=self.day_end_hour).contains(&hour)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `poll_interval = 10ms`
    /// - `tick = 500ms`
    /// - `utc_offset_secs = -18000` (UTC-5)
    /// - `time_servers = ["time.windows.com", "pool.ntp.org"]`
    /// - full brightness from 07:00 through 21:59
    /// - 12-hour rendering
    /// - display at `0x70` on port 0, SDA 33, SCL 32, 400 kHz
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            tick: DEFAULT_TICK,
            utc_offset_secs: -5 * 3600,
            time_servers: vec!["time.windows.com".to_string(), "pool.ntp.org".to_string()],
            day_start_hour: 7,
            day_end_hour: 21,
            twelve_hour: true,
            i2c: I2cConfig::default(),
        }
    }
}
