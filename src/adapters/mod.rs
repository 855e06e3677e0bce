//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to              |
//! |------------|------------------|--------------------------|
//! | `ble`      | NotificationPort | BLE GATT notify char     |
//! |            | (inbound)        | GATT write → payload queue |
//! | `hardware` | SensorPort       | DHT22, PIR, HC-SR04      |
//! |            | ActuatorPort     | Relays, LEDC PWM         |
//! | `nvs`      | StoragePort      | NVS / in-memory store    |
//! | `time`     | ClockPort        | System wall clock/timer  |

pub mod ble;
pub mod hardware;
pub mod nvs;
pub mod time;
