//! Expander board adapter.  Bridges the PCF8574 banks to the port traits.
//!
//! Owns the I2C bus and all three expanders and exposes them through
//! [`InputPort`] and [`OutputPort`].  Share one board between both
//! directions with `Rc<RefCell<ExpanderBoard<_>>>`.
//!
//! Inputs read `On` for a HIGH pin.  Relay outputs are active-low: `On`
//! drives the pin LOW, anything else HIGH.

use embedded_hal::i2c::{Error as _, I2c};
use log::{info, warn};

use crate::app::ports::{InputPort, OutputPort};
use crate::drivers::pcf8574::{Pcf8574, PinMode};
use crate::model::DiscreteState;
use crate::pins::{
    INPUT_CHANNEL_MAP, INPUT_EXPANDER_ADDRESSES, OUTPUT_CHANNEL_MAP, OUTPUT_EXPANDER_ADDRESSES,
};

pub struct ExpanderBoard<I> {
    i2c: I,
    inputs: [Pcf8574; INPUT_EXPANDER_ADDRESSES.len()],
    outputs: [Pcf8574; OUTPUT_EXPANDER_ADDRESSES.len()],
}

impl<I: I2c> ExpanderBoard<I> {
    /// Set up pin modes.  No bus traffic until [`begin`](Self::begin).
    pub fn new(i2c: I) -> Self {
        let inputs = INPUT_EXPANDER_ADDRESSES.map(Pcf8574::new);
        let mut outputs = OUTPUT_EXPANDER_ADDRESSES.map(Pcf8574::new);
        for p in &OUTPUT_CHANNEL_MAP {
            if let Some(chip) = outputs.get_mut(p.expander) {
                chip.set_pin_mode(p.pin, PinMode::Output);
            }
        }
        Self { i2c, inputs, outputs }
    }

    /// Probe every expander and drive all outputs off.
    ///
    /// Returns `true` when every chip answered.  Missing chips are retried
    /// on each cycle, so a `false` here is not fatal.
    pub fn begin(&mut self) -> bool {
        let mut all_ok = true;
        for chip in self.inputs.iter_mut() {
            if let Err(e) = chip.begin(&mut self.i2c) {
                warn!("input expander {:#04x} not responding: {:?}", chip.address(), e.kind());
                all_ok = false;
            }
        }
        for chip in self.outputs.iter_mut() {
            if let Err(e) = chip.write_all(&mut self.i2c) {
                warn!("output expander {:#04x} not responding: {:?}", chip.address(), e.kind());
                all_ok = false;
            }
        }
        all_ok
    }

    /// Number of expanders whose last transaction succeeded.
    pub fn connected_count(&self) -> usize {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .filter(|c| c.connected())
            .count()
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

/// Log only connection transitions, not every failed cycle.
fn report<E: embedded_hal::i2c::Error>(chip: &Pcf8574, was_connected: bool, result: Result<(), E>) {
    match result {
        Err(e) if was_connected => {
            warn!("expander {:#04x} lost: {:?}", chip.address(), e.kind());
        }
        Ok(()) if !was_connected => info!("expander {:#04x} online", chip.address()),
        _ => {}
    }
}

impl<I: I2c> InputPort for ExpanderBoard<I> {
    fn refresh(&mut self) {
        for chip in self.inputs.iter_mut() {
            let was = chip.connected();
            let result = chip.read_all(&mut self.i2c).map(|_| ());
            report(chip, was, result);
        }
    }

    fn get_current_value(&self, channel: usize) -> Option<DiscreteState> {
        let p = INPUT_CHANNEL_MAP.get(channel)?;
        let chip = self.inputs.get(p.expander).filter(|c| c.connected())?;
        let high = chip.digital_read(p.pin)?;
        Some(if high { DiscreteState::On } else { DiscreteState::Off })
    }
}

impl<I: I2c> OutputPort for ExpanderBoard<I> {
    fn set_current_value(&mut self, channel: usize, state: DiscreteState) {
        let Some(p) = OUTPUT_CHANNEL_MAP.get(channel) else {
            warn!("output {} has no relay", channel);
            return;
        };
        if let Some(chip) = self.outputs.get_mut(p.expander) {
            chip.digital_write(p.pin, state != DiscreteState::On);
        }
    }

    fn flush(&mut self) {
        for chip in self.outputs.iter_mut() {
            let was = chip.connected();
            let result = chip.write_all(&mut self.i2c);
            report(chip, was, result);
        }
    }
}
