//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (actuators, sensors, clock, BLE notify, storage)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! The inbound direction has no trait: transports deliver one raw payload
//! per receipt into the SPSC queue in [`crate::events`], and the main loop
//! drains it into [`AppService::handle_payload`](super::service::AppService::handle_payload).

use crate::app::commands::Relay;
use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// All operations are fire-and-forget; hardware faults are not surfaced
/// upward in the current design.
pub trait ActuatorPort {
    /// Switch a relay channel.
    fn set_relay(&mut self, relay: Relay, on: bool);

    /// Set fan PWM duty (0-255).
    fn set_fan_pwm(&mut self, value: u8);

    /// Set LED strip brightness (0-255).
    fn set_led_brightness(&mut self, value: u8);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Read every sensor and return a unified snapshot.
    fn read(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock and uptime queries.
pub trait ClockPort {
    /// Current minute-of-day, `0..1440`. Monotonic within a day,
    /// wraps at midnight.
    fn minute_of_day(&self) -> u16;

    /// Milliseconds since boot (monotonic) — used as the report timestamp.
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Notification port (driven adapter: domain → connected peer)
// ───────────────────────────────────────────────────────────────

/// Best-effort outbound push to a connected peer.
///
/// Silently a no-op when no peer is connected — the domain never learns
/// whether a notification was delivered.
pub trait NotificationPort {
    fn notify(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for preferences.
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Write operations MUST be atomic — no partial writes on power loss.
/// The ESP-IDF NVS API guarantees this natively; in-memory simulation
/// achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
