//! ESP32 time adapter.
//!
//! Implements [`ClockPort`] for the SmartSync node.
//!
//! - **`target_os = "espidf"`** — minute-of-day from `gettimeofday` +
//!   `localtime_r` (RTC/NTP-backed), uptime from `esp_timer_get_time()`.
//!   Before the wall clock is synced, minute-of-day falls back to an
//!   uptime-derived value so the learner still sees a consistent,
//!   midnight-wrapping clock.
//! - **`not(target_os = "espidf")`** — `std::time` for host-side testing.

use crate::app::ports::ClockPort;
use crate::config::MINUTES_PER_DAY;

/// Clock adapter over the platform time sources.
pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Wall-clock minute-of-day, `None` when the clock is not yet synced.
    #[cfg(target_os = "espidf")]
    fn wall_minute(&self) -> Option<u16> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unsynced time (e.g. before 2020-01-01)
        const EPOCH_2020: i64 = 1_577_836_800;
        if tv.tv_sec < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        if !(0..=23).contains(&tm.tm_hour) || !(0..=59).contains(&tm.tm_min) {
            return None;
        }
        Some((tm.tm_hour * 60 + tm.tm_min) as u16)
    }
}

impl ClockPort for SystemClock {
    #[cfg(target_os = "espidf")]
    fn minute_of_day(&self) -> u16 {
        self.wall_minute()
            .unwrap_or_else(|| ((self.uptime_ms() / 60_000) % u64::from(MINUTES_PER_DAY)) as u16)
    }

    #[cfg(not(target_os = "espidf"))]
    fn minute_of_day(&self) -> u16 {
        // Host simulation: UTC minute-of-day.
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        ((secs / 60) % u64::from(MINUTES_PER_DAY)) as u16
    }

    #[cfg(target_os = "espidf")]
    fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
