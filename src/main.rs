//! SmartSync Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single-threaded cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    BleAdapter       NvsAdapter   SystemClock  │
//! │  (Sensor+Actuator)  (queue in /      (StoragePort) (ClockPort) │
//! │                      notify out)                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Protocol decode · Dispatch · Usage learner            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use smartsync::adapters::ble::BleAdapter;
use smartsync::adapters::hardware::HardwareAdapter;
use smartsync::adapters::nvs::NvsAdapter;
use smartsync::adapters::time::SystemClock;
use smartsync::app::ports::{ClockPort, SensorPort};
use smartsync::app::service::AppService;
use smartsync::config::SystemConfig;
use smartsync::drivers::hw_init;
use smartsync::events;
use smartsync::pins;
use smartsync::sensors::climate::ClimateSensor;
use smartsync::sensors::presence::PresenceSensor;
use smartsync::sensors::SensorHub;

/// Control loop idle delay. Short enough that a GATT write is picked up
/// promptly, long enough to keep the idle task fed.
const LOOP_DELAY_MS: u32 = 50;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartSync v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Storage, clock, sensors, actuators ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running without persistence", e);
            None
        }
    };
    let clock = SystemClock::new();

    let hub = SensorHub::new(
        ClimateSensor::new(pins::DHT_GPIO),
        PresenceSensor::new(
            pins::PIR_GPIO,
            pins::ULTRASONIC_TRIG_GPIO,
            pins::ULTRASONIC_ECHO_GPIO,
        ),
    );
    let mut hw = HardwareAdapter::new(hub);

    // ── 4. Application service ────────────────────────────────
    let config = SystemConfig::default();
    let status_interval = u64::from(config.status_report_interval_ms);
    let sensor_interval = u64::from(config.sensor_read_interval_ms);
    let mut app = AppService::new(config);
    if let Some(nvs) = &nvs {
        app.load_prefs(nvs);
    }
    app.apply_prefs(&mut hw);

    // ── 5. BLE transport ──────────────────────────────────────
    let mut ble = BleAdapter::new();
    ble.start();

    info!("SmartSync ready — entering control loop");

    // ── 6. Control loop ───────────────────────────────────────
    let mut last_report_ms = 0u64;
    let mut last_sensor_ms = 0u64;

    loop {
        // Commands first: one payload is parsed and dispatched to
        // completion before the next.
        events::drain_payloads(|payload| {
            app.handle_payload(payload, &mut hw, &clock, &mut ble);
        });

        let now = clock.uptime_ms();

        // Periodic sensor read (logged locally even without a peer).
        if now.saturating_sub(last_sensor_ms) >= sensor_interval {
            last_sensor_ms = now;
            let snap = hw.read();
            log::debug!(
                "sensors: {:.1}degC {:.1}%RH motion={} dist={:.0}cm",
                snap.temperature_c,
                snap.humidity_pct,
                snap.motion,
                snap.distance_cm
            );
        }

        // Periodic status report to the connected peer.
        if ble.is_connected() && now.saturating_sub(last_report_ms) >= status_interval {
            last_report_ms = now;
            app.push_status_report(&mut hw, &clock, &mut ble);
        }

        // Flush preferences once the save delay has passed.
        if let Some(nvs) = nvs.as_mut() {
            app.save_prefs_if_needed(nvs, now);
        }

        std::thread::sleep(std::time::Duration::from_millis(u64::from(LOOP_DELAY_MS)));
    }
}
