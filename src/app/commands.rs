//! Inbound commands to the application service.
//!
//! One unified representation for both wire grammars (colon-delimited text
//! and compact JSON — see [`crate::protocol`]). The
//! [`AppService`](super::service::AppService) interprets a `Command` and
//! acts on it; commands are transient and never stored.

use heapless::Vec;

/// Upper bound on `SIMLOG` samples accepted in a single command.
pub const MAX_SEED_SAMPLES: usize = 32;

/// A relay-switched load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    Bulb1,
    Bulb2,
    Fan,
}

/// Commands that external transports can send into the application core.
///
/// Appliance ids are carried raw here; the dispatcher validates them
/// through [`ApplianceId::new`](crate::learner::ApplianceId::new) before
/// any log is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch a relay on or off.
    SetRelay { relay: Relay, on: bool },

    /// Set fan PWM duty (0-255).
    SetFanPwm { value: u8 },

    /// Set LED strip brightness (0-255).
    SetLedBrightness { value: u8 },

    /// Enable or disable auto mode (flag only — stored and reported).
    SetAutoMode { enabled: bool },

    /// Request an immediate sensor-snapshot report.
    StatusRequest,

    /// Record a manual toggle for the learner at the current time.
    LogManualToggle { appliance: u8 },

    /// Batch-inject historical toggle times (learning bootstrap / testing).
    SeedLog {
        appliance: u8,
        /// Minute-of-day values in occurrence order.
        minutes: Vec<u16, MAX_SEED_SAMPLES>,
    },

    /// User accepted a previously sent suggestion.
    AcceptSuggestion { appliance: u8 },

    /// Syntactically valid but unknown — ignored without error.
    Unrecognized,
}
