//! I2C bus and expander wiring for the light controller board.
//!
//! Single source of truth: the expander board adapter and `main` read the
//! bus pins, expander addresses and channel maps from here.

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------

/// Bus data line.
pub const I2C_SDA_GPIO: i32 = 21;
/// Bus clock line.
pub const I2C_SCL_GPIO: i32 = 22;
/// Standard-mode clock; the PCF8574 tops out at 100 kHz.
pub const I2C_BAUDRATE_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PCF8574 expanders
// ---------------------------------------------------------------------------

/// Wall-switch opto-coupler banks.  A closed switch reads HIGH.
pub const INPUT_EXPANDER_ADDRESSES: [u8; 2] = [0x20, 0x21];

/// Relay driver bank.  Relays are active-low.
pub const OUTPUT_EXPANDER_ADDRESSES: [u8; 1] = [0x24];

/// Where one logical channel lives: expander index and pin (P0..P7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpanderPin {
    pub expander: usize,
    pub pin: u8,
}

const fn at(expander: usize, pin: u8) -> ExpanderPin {
    ExpanderPin { expander, pin }
}

/// Input channel → expander pin, following the terminal block order.
pub const INPUT_CHANNEL_MAP: [ExpanderPin; 16] = [
    at(0, 5), // in1
    at(1, 3),
    at(0, 4),
    at(1, 4),
    at(0, 0), // in5
    at(1, 0),
    at(0, 3),
    at(1, 5),
    at(0, 2), // in9
    at(1, 6),
    at(0, 1),
    at(1, 7),
    at(0, 7), // in13
    at(1, 1),
    at(0, 6),
    at(1, 2),
];

/// Output channel → expander pin.
pub const OUTPUT_CHANNEL_MAP: [ExpanderPin; 8] = [
    at(0, 5), // out1
    at(0, 4),
    at(0, 0),
    at(0, 3),
    at(0, 2), // out5
    at(0, 1),
    at(0, 7),
    at(0, 6),
];
