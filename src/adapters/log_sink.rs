//! Log-based event sender adapter.
//!
//! Implements [`EventSender`] and [`GlobalOffSender`] by writing to the
//! logger (UART / USB-CDC in production).  A network publisher would
//! implement the same traits.

use core::fmt;

use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{EventSender, GlobalOffSender};
use crate::model::{EventType, MAX_INPUT_CHANNELS};

/// Collects one cycle's events and logs them as a single line.
#[derive(Default)]
pub struct LogEventSender {
    batch: Vec<(usize, EventType), MAX_INPUT_CHANNELS>,
    global_off_pulses: u32,
}

impl LogEventSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global-off pulses sent since construction.
    pub fn global_off_pulses(&self) -> u32 {
        self.global_off_pulses
    }
}

impl EventSender for LogEventSender {
    fn begin_send_events(&mut self) {
        self.batch.clear();
    }

    fn send_event(&mut self, channel: usize, event: EventType) {
        if self.batch.push((channel, event)).is_err() {
            warn!("EVENT | batch full, dropped input {} {}", channel, event);
        }
    }

    fn end_send_events(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        info!("EVENT | {}", Batch(&self.batch));
    }
}

/// `in0 rise, in3 fall`
struct Batch<'a>(&'a [(usize, EventType)]);

impl fmt::Display for Batch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (channel, event)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "in{channel} {event}")?;
        }
        Ok(())
    }
}

impl GlobalOffSender for LogEventSender {
    fn send_global_off(&mut self) {
        self.global_off_pulses = self.global_off_pulses.wrapping_add(1);
        info!("GLOBAL OFF | pulse #{}", self.global_off_pulses);
    }
}
