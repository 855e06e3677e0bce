//! PIR motion detector + HC-SR04 ultrasonic ranger.
//!
//! The PIR output is a plain digital level. The HC-SR04 is triggered with
//! a 10 µs pulse and answers with an echo pulse whose width encodes the
//! round-trip time (distance_cm = width_us * 0.034 / 2).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads GPIO directly and busy-measures the echo pulse with
//! a 30 ms timeout (~5 m range).
//! On host/test: reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_MOTION: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_DISTANCE_MM: AtomicU32 = AtomicU32::new(0);

/// Inject a simulated presence reading (host tests only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_presence(motion: bool, distance_cm: f32) {
    SIM_MOTION.store(motion, Ordering::Relaxed);
    SIM_DISTANCE_MM.store((distance_cm * 10.0) as u32, Ordering::Relaxed);
}

/// Echo timeout — 30 ms covers the sensor's ~5 m maximum range.
#[cfg(target_os = "espidf")]
const ECHO_TIMEOUT_US: u32 = 30_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceReading {
    pub motion: bool,
    /// Range to the nearest obstacle (cm); 0.0 when no echo returned.
    pub distance_cm: f32,
}

pub struct PresenceSensor {
    _pir_gpio: i32,
    _trig_gpio: i32,
    _echo_gpio: i32,
}

impl PresenceSensor {
    pub fn new(pir_gpio: i32, trig_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _pir_gpio: pir_gpio,
            _trig_gpio: trig_gpio,
            _echo_gpio: echo_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> PresenceReading {
        use crate::drivers::hw_init;

        let motion = hw_init::gpio_read(self._pir_gpio);

        // 10 µs trigger pulse.
        hw_init::gpio_write(self._trig_gpio, false);
        unsafe { esp_idf_svc::sys::ets_delay_us(2) };
        hw_init::gpio_write(self._trig_gpio, true);
        unsafe { esp_idf_svc::sys::ets_delay_us(10) };
        hw_init::gpio_write(self._trig_gpio, false);

        let distance_cm = match measure_echo_us(self._echo_gpio) {
            Some(width_us) => width_us as f32 * 0.034 / 2.0,
            None => 0.0,
        };

        PresenceReading {
            motion,
            distance_cm,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> PresenceReading {
        PresenceReading {
            motion: SIM_MOTION.load(Ordering::Relaxed),
            distance_cm: SIM_DISTANCE_MM.load(Ordering::Relaxed) as f32 / 10.0,
        }
    }
}

/// Wait for the echo pulse and measure its width in microseconds.
/// `None` when the pulse never starts or exceeds the timeout.
#[cfg(target_os = "espidf")]
fn measure_echo_us(echo_gpio: i32) -> Option<u32> {
    use crate::drivers::hw_init;

    let mut waited = 0;
    while !hw_init::gpio_read(echo_gpio) {
        waited += 1;
        if waited > ECHO_TIMEOUT_US {
            return None;
        }
        unsafe { esp_idf_svc::sys::ets_delay_us(1) };
    }

    let mut width = 0;
    while hw_init::gpio_read(echo_gpio) {
        width += 1;
        if width > ECHO_TIMEOUT_US {
            return None;
        }
        unsafe { esp_idf_svc::sys::ets_delay_us(1) };
    }
    Some(width)
}
