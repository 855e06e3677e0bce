//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the per-appliance toggle logs, the pattern
//! evaluator, and the runtime preferences.  It decodes inbound payloads,
//! dispatches the resulting commands, and pushes suggestion/status
//! messages to the notification port.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  payload ──▶ protocol::decode ──▶ ┌──────────────────────┐ ──▶ ActuatorPort
//!                                   │      AppService      │ ──▶ NotificationPort
//!                   SensorPort ───▶ │  LogBank · Evaluator │
//!                   ClockPort  ───▶ └──────────────────────┘
//! ```

use core::fmt::Write as _;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::commands::{Command, Relay};
use crate::app::ports::{ActuatorPort, ClockPort, NotificationPort, SensorPort, StoragePort};
use crate::config::{SystemConfig, LOG_CAPACITY};
use crate::error::{Error, Result};
use crate::learner::{ApplianceId, LogBank, PatternEvaluator};
use crate::protocol;

/// NVS namespace and key for the preferences blob.
const PREFS_NAMESPACE: &str = "smartsync";
const PREFS_KEY: &str = "prefs";

// ───────────────────────────────────────────────────────────────
// Preferences
// ───────────────────────────────────────────────────────────────

/// Runtime settings mirrored to NVS so they survive a power cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Preferences {
    /// Auto-mode flag. Stored and reported only — closed-loop regulation
    /// is handled by the companion app, not this firmware.
    pub auto_mode: bool,
    /// Last commanded fan PWM duty (0-255).
    pub fan_speed: u8,
    /// Last commanded LED brightness (0-255).
    pub led_brightness: u8,
}

impl Preferences {
    fn first_boot(config: &SystemConfig) -> Self {
        Self {
            auto_mode: false,
            fan_speed: 0,
            led_brightness: config.default_led_brightness,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Status report
// ───────────────────────────────────────────────────────────────

/// Outbound sensor-snapshot message (JSON wire format).
#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(rename = "type")]
    kind: &'static str,
    temperature: f32,
    humidity: f32,
    fan_speed: u8,
    led_brightness: u8,
    motion: bool,
    distance: f32,
    timestamp: u64,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service: command dispatch plus the usage learner.
pub struct AppService {
    config: SystemConfig,
    logs: LogBank,
    evaluator: PatternEvaluator,
    prefs: Preferences,
    prefs_dirty: bool,
    dirty_since_ms: u64,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            evaluator: PatternEvaluator::new(&config),
            prefs: Preferences::first_boot(&config),
            config,
            logs: LogBank::new(),
            prefs_dirty: false,
            dirty_since_ms: 0,
        }
    }

    // ── Payload entry point ───────────────────────────────────

    /// Decode and dispatch one raw inbound payload.
    ///
    /// This is the boundary the error model is built around: a malformed
    /// payload or invalid appliance id is logged and dropped here, and
    /// nothing propagates to the control loop.
    pub fn handle_payload(
        &mut self,
        payload: &[u8],
        hw: &mut (impl ActuatorPort + SensorPort),
        clock: &impl ClockPort,
        notifier: &mut impl NotificationPort,
    ) {
        match protocol::decode(payload) {
            Ok(cmd) => {
                if let Err(e) = self.dispatch(cmd, hw, clock, notifier) {
                    warn!("command dropped: {}", e);
                }
            }
            Err(e) => {
                warn!("unparseable payload dropped: {}", e);
            }
        }
    }

    // ── Command dispatch ──────────────────────────────────────

    /// Route one typed command. Synchronous; worst case is one sort of a
    /// single appliance log.
    ///
    /// The `hw` parameter satisfies **both** [`ActuatorPort`] and
    /// [`SensorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn dispatch(
        &mut self,
        cmd: Command,
        hw: &mut (impl ActuatorPort + SensorPort),
        clock: &impl ClockPort,
        notifier: &mut impl NotificationPort,
    ) -> Result<()> {
        match cmd {
            Command::SetRelay { relay, on } => {
                hw.set_relay(relay, on);
                // Fan toggles are the learner's raw signal; bulbs are not
                // tracked (yet — their logs exist but nothing feeds them).
                if relay == Relay::Fan {
                    self.record_toggle(ApplianceId::FAN, clock.minute_of_day(), notifier);
                }
                Ok(())
            }

            Command::SetFanPwm { value } => {
                hw.set_fan_pwm(value);
                self.prefs.fan_speed = value;
                self.mark_prefs_dirty(clock);
                Ok(())
            }

            Command::SetLedBrightness { value } => {
                hw.set_led_brightness(value);
                self.prefs.led_brightness = value;
                self.mark_prefs_dirty(clock);
                Ok(())
            }

            Command::SetAutoMode { enabled } => {
                self.prefs.auto_mode = enabled;
                self.mark_prefs_dirty(clock);
                info!("auto mode {}", if enabled { "enabled" } else { "disabled" });
                Ok(())
            }

            Command::StatusRequest => {
                self.push_status_report(hw, clock, notifier);
                Ok(())
            }

            Command::LogManualToggle { appliance } => {
                let id = self.checked_id(appliance)?;
                self.record_toggle(id, clock.minute_of_day(), notifier);
                Ok(())
            }

            Command::SeedLog { appliance, minutes } => {
                // Validate once; a bad id seeds nothing.
                let id = self.checked_id(appliance)?;
                for minute in minutes {
                    self.record_toggle(id, minute, notifier);
                }
                Ok(())
            }

            Command::AcceptSuggestion { appliance } => {
                let id = self.checked_id(appliance)?;
                // TODO: persist the accepted schedule once the schedule
                // storage format is settled; for now the peer is only
                // acknowledged.
                let mut msg = heapless::String::<32>::new();
                let _ = write!(msg, "SUGGEST_ACCEPTED:{}", id);
                notifier.notify(&msg);
                info!("suggestion accepted for appliance {}", id);
                Ok(())
            }

            Command::Unrecognized => {
                debug!("unrecognized command ignored");
                Ok(())
            }
        }
    }

    // ── Learner hookup ────────────────────────────────────────

    /// Record one manual toggle and re-evaluate the appliance's pattern,
    /// pushing a suggestion to the peer when a stable habit emerges.
    fn record_toggle(
        &mut self,
        id: ApplianceId,
        minute: u16,
        notifier: &mut impl NotificationPort,
    ) {
        self.logs.get_mut(id).record(minute);

        if let Some(suggestion) = self.evaluator.evaluate(id, self.logs.get(id)) {
            info!(
                "usage cluster on appliance {} around minute {}",
                suggestion.appliance, suggestion.minute
            );
            let mut msg = heapless::String::<32>::new();
            let _ = write!(msg, "SUGGEST:{}:{}", suggestion.appliance, suggestion.minute);
            notifier.notify(&msg);
        }
    }

    fn checked_id(&self, raw: u8) -> Result<ApplianceId> {
        ApplianceId::new(raw).ok_or(Error::InvalidAppliance(raw))
    }

    // ── Status reporting ──────────────────────────────────────

    /// Read the sensors and push the snapshot JSON to the peer.
    /// Also called periodically by the main loop.
    pub fn push_status_report(
        &mut self,
        hw: &mut impl SensorPort,
        clock: &impl ClockPort,
        notifier: &mut impl NotificationPort,
    ) {
        let snap = hw.read();
        let report = StatusReport {
            kind: "sensor_data",
            temperature: snap.temperature_c,
            humidity: snap.humidity_pct,
            fan_speed: self.prefs.fan_speed,
            led_brightness: self.prefs.led_brightness,
            motion: snap.motion,
            distance: snap.distance_cm,
            timestamp: clock.uptime_ms(),
        };
        match serde_json::to_string(&report) {
            Ok(json) => notifier.notify(&json),
            Err(e) => warn!("status report serialisation failed: {}", e),
        }
    }

    // ── Preferences lifecycle ─────────────────────────────────

    /// Load persisted preferences, falling back to first-boot defaults.
    pub fn load_prefs(&mut self, storage: &impl StoragePort) {
        let mut buf = [0u8; 64];
        match storage.read(PREFS_NAMESPACE, PREFS_KEY, &mut buf) {
            Ok(len) => match postcard::from_bytes::<Preferences>(&buf[..len]) {
                Ok(prefs) => {
                    self.prefs = prefs;
                    info!("preferences loaded from NVS");
                }
                Err(_) => {
                    warn!("stored preferences corrupted, using defaults");
                    self.prefs = Preferences::first_boot(&self.config);
                }
            },
            Err(_) => {
                info!("no stored preferences, using defaults");
            }
        }
    }

    /// Re-apply the loaded preferences to the actuators (boot restore).
    pub fn apply_prefs(&self, hw: &mut impl ActuatorPort) {
        hw.set_fan_pwm(self.prefs.fan_speed);
        hw.set_led_brightness(self.prefs.led_brightness);
    }

    fn mark_prefs_dirty(&mut self, clock: &impl ClockPort) {
        if !self.prefs_dirty {
            self.prefs_dirty = true;
            self.dirty_since_ms = clock.uptime_ms();
        }
    }

    /// Flush dirty preferences once the save delay has elapsed.
    /// Returns `true` if a save happened.
    pub fn save_prefs_if_needed(
        &mut self,
        storage: &mut impl StoragePort,
        now_ms: u64,
    ) -> bool {
        if !self.prefs_dirty {
            return false;
        }
        if now_ms.saturating_sub(self.dirty_since_ms) < u64::from(self.config.prefs_save_delay_ms)
        {
            return false;
        }
        match postcard::to_allocvec(&self.prefs) {
            Ok(bytes) => match storage.write(PREFS_NAMESPACE, PREFS_KEY, &bytes) {
                Ok(()) => {
                    self.prefs_dirty = false;
                    info!("preferences saved to NVS");
                    true
                }
                Err(e) => {
                    warn!("preferences save failed: {}", e);
                    false
                }
            },
            Err(_) => {
                warn!("preferences serialisation failed");
                false
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn auto_mode(&self) -> bool {
        self.prefs.auto_mode
    }

    pub fn fan_speed(&self) -> u8 {
        self.prefs.fan_speed
    }

    pub fn led_brightness(&self) -> u8 {
        self.prefs.led_brightness
    }

    pub fn is_prefs_dirty(&self) -> bool {
        self.prefs_dirty
    }

    /// Insertion-ordered toggle history for one appliance (inspection).
    pub fn log_snapshot(&self, id: ApplianceId) -> heapless::Vec<u16, LOG_CAPACITY> {
        self.logs.get(id).snapshot()
    }
}
