//! Peripheral drivers.

pub mod pcf8574;
