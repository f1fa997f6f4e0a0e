//! PCF8574 8-bit quasi-bidirectional I2C GPIO expander.
//!
//! ## Hardware
//!
//! The chip has no direction register: a pin written HIGH is a weak
//! pull-up and can be read as an input, a pin written LOW sinks current.
//! One byte read returns all eight pin levels; one byte written sets all
//! eight latches.
//!
//! The driver keeps a one-byte buffer.  [`read_all`](Pcf8574::read_all)
//! refreshes it from the chip, [`write_all`](Pcf8574::write_all) pushes it,
//! and the per-pin accessors only touch the buffer.  Input pins are always
//! written HIGH so they keep working as inputs.
//!
//! The bus is passed into each transaction, so several expanders can share
//! one `I2c` instance without a bus-sharing wrapper.

use embedded_hal::i2c::I2c;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

pub struct Pcf8574 {
    address: u8,
    /// Last bus transaction succeeded.
    connected: bool,
    /// Bit set = pin used as output.
    output_mask: u8,
    /// Pin levels: last read for inputs, pending latch for outputs.
    buffer: u8,
}

impl Pcf8574 {
    /// All pins start as inputs with the buffer high.
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            connected: false,
            output_mask: 0x00,
            buffer: 0xFF,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn pin_mode(&self, pin: u8) -> PinMode {
        if self.output_mask & mask(pin) != 0 {
            PinMode::Output
        } else {
            PinMode::Input
        }
    }

    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        match mode {
            PinMode::Output => self.output_mask |= mask(pin),
            PinMode::Input => {
                self.output_mask &= !mask(pin);
                self.buffer |= mask(pin);
            }
        }
    }

    /// Probe the chip with a one-byte read.
    pub fn begin<I: I2c>(&mut self, i2c: &mut I) -> Result<(), I::Error> {
        self.read_all(i2c).map(|_| ())
    }

    /// Latch all eight pins into the buffer.
    pub fn read_all<I: I2c>(&mut self, i2c: &mut I) -> Result<u8, I::Error> {
        let mut byte = [0u8];
        let result = i2c.read(self.address, &mut byte);
        self.connected = result.is_ok();
        result?;

        // Keep pending output latches; take inputs from the chip.
        self.buffer = (self.buffer & self.output_mask) | (byte[0] & !self.output_mask);
        Ok(byte[0])
    }

    /// Write the buffer to the chip.  Input pins are sent HIGH.
    pub fn write_all<I: I2c>(&mut self, i2c: &mut I) -> Result<(), I::Error> {
        let value = self.buffer | !self.output_mask;
        let result = i2c.write(self.address, &[value]);
        self.connected = result.is_ok();
        result
    }

    /// Buffered level of `pin`; `None` for a pin number above 7.
    pub fn digital_read(&self, pin: u8) -> Option<bool> {
        (pin < 8).then(|| self.buffer & mask(pin) != 0)
    }

    /// Set the buffered level of `pin`.  Takes effect on the next
    /// [`write_all`](Self::write_all).  Ignored for input pins.
    pub fn digital_write(&mut self, pin: u8, high: bool) {
        if pin >= 8 || self.pin_mode(pin) == PinMode::Input {
            return;
        }
        if high {
            self.buffer |= mask(pin);
        } else {
            self.buffer &= !mask(pin);
        }
    }
}

const fn mask(pin: u8) -> u8 {
    if pin < 8 { 1 << pin } else { 0 }
}
