//! System configuration parameters
//!
//! All tunable parameters for the SmartSync node. Runtime user settings
//! (fan speed, LED brightness, auto mode) are not here — they live in the
//! NVS-backed `Preferences` blob owned by the application service.

use serde::{Deserialize, Serialize};

/// Number of appliances the node controls. Appliance ids are
/// `0..APPLIANCE_COUNT`; id 0 is the fan, the only appliance whose manual
/// toggles currently feed the learner.
pub const APPLIANCE_COUNT: usize = 4;

/// Usage samples retained per appliance (two weeks of once-a-day use).
pub const LOG_CAPACITY: usize = 14;

/// Minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pattern learner ---
    /// Minimum logged samples before a suggestion is considered
    pub min_samples: u8,
    /// Maximum spread (minutes) for samples to count as a stable habit
    pub cluster_threshold_min: u16,

    // --- First-boot defaults ---
    /// LED brightness applied when no preferences are stored (0-255)
    pub default_led_brightness: u8,

    // --- Timing ---
    /// Sensor read interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Outbound sensor-report interval (milliseconds)
    pub status_report_interval_ms: u32,
    /// Preferences auto-save delay after last change (milliseconds)
    pub prefs_save_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Learner
            min_samples: 4,
            cluster_threshold_min: 60,

            // First-boot defaults
            default_led_brightness: 128,

            // Timing
            sensor_read_interval_ms: 10_000, // 0.1 Hz
            status_report_interval_ms: 5_000,
            prefs_save_delay_ms: 5_000,
        }
    }
}
