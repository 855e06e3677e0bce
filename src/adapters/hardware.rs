//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::commands::Relay;
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::pwm::PwmOutput;
use crate::drivers::relay::RelayDriver;
use crate::pins;
use crate::sensors::{SensorHub, SensorSnapshot};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    bulb1: RelayDriver,
    bulb2: RelayDriver,
    fan_relay: RelayDriver,
    fan_pwm: PwmOutput,
    led_pwm: PwmOutput,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub) -> Self {
        Self {
            sensor_hub,
            bulb1: RelayDriver::new(pins::RELAY_BULB1_GPIO),
            bulb2: RelayDriver::new(pins::RELAY_BULB2_GPIO),
            fan_relay: RelayDriver::new(pins::RELAY_FAN_GPIO),
            fan_pwm: PwmOutput::new(pins::FAN_PWM_CHANNEL),
            led_pwm: PwmOutput::new(pins::LED_PWM_CHANNEL),
        }
    }

    fn relay_driver(&mut self, relay: Relay) -> &mut RelayDriver {
        match relay {
            Relay::Bulb1 => &mut self.bulb1,
            Relay::Bulb2 => &mut self.bulb2,
            Relay::Fan => &mut self.fan_relay,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, relay: Relay, on: bool) {
        self.relay_driver(relay).set(on);
    }

    fn set_fan_pwm(&mut self, value: u8) {
        self.fan_pwm.set(value);
    }

    fn set_led_brightness(&mut self, value: u8) {
        self.led_pwm.set(value);
    }
}
