//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] on
//! demand (periodic reads and `GET_STATUS` requests).

pub mod climate;
pub mod presence;

use climate::ClimateSensor;
use presence::PresenceSensor;

/// A point-in-time snapshot of every sensor on the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Ambient temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%).
    pub humidity_pct: f32,
    /// PIR motion detector state.
    pub motion: bool,
    /// Ultrasonic range to the nearest obstacle (cm); 0.0 when no echo.
    pub distance_cm: f32,
}

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    climate: ClimateSensor,
    presence: PresenceSensor,
    /// Last good climate reading, retained across failed DHT reads.
    last_climate: (f32, f32),
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(climate: ClimateSensor, presence: PresenceSensor) -> Self {
        Self {
            climate,
            presence,
            last_climate: (0.0, 0.0),
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// A failed DHT read (checksum error, bus timeout) is logged and the
    /// previous good values are retained — one flaky sensor must not
    /// produce garbage reports.
    pub fn read_all(&mut self) -> SensorSnapshot {
        match self.climate.read() {
            Some(reading) => {
                self.last_climate = (reading.temperature_c, reading.humidity_pct);
            }
            None => {
                log::warn!("climate read failed, keeping previous values");
            }
        }

        let presence = self.presence.read();

        SensorSnapshot {
            temperature_c: self.last_climate.0,
            humidity_pct: self.last_climate.1,
            motion: presence.motion,
            distance_cm: presence.distance_cm,
        }
    }
}
