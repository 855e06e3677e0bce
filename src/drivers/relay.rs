//! Relay channel driver.
//!
//! Each relay is a plain GPIO output driving an NPN transistor into the
//! relay coil (active HIGH). The driver tracks commanded state so the
//! adapter can report it without a register read.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct RelayDriver {
    gpio: i32,
    on: bool,
}

impl RelayDriver {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
