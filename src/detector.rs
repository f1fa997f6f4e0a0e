//! Rise/fall detector over consecutive control cycles.
//!
//! Two fixed-size state banks are used ping-pong style: the caller writes
//! this cycle's states into the *current* bank, [`EventDetector::execute`]
//! compares it with the *previous* bank and then flips the selector, so the
//! bank just written becomes *previous* for the next cycle.  No state vector
//! is ever copied.
//!
//! ```text
//!   cycle N:    write ─▶ [bank B]   compare with [bank A]   flip
//!   cycle N+1:  write ─▶ [bank A]   compare with [bank B]   flip
//! ```

use log::debug;

use crate::error::{ControlError, Result};
use crate::model::{DiscreteState, EventType, MAX_INPUT_CHANNELS};

pub struct EventDetector {
    banks: [[DiscreteState; MAX_INPUT_CHANNELS]; 2],
    /// Index of the bank that receives this cycle's states.
    current: usize,
    events: [EventType; MAX_INPUT_CHANNELS],
    channel_count: usize,
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetector {
    /// A detector with zero channels; call [`set_channel_count`](Self::set_channel_count).
    pub fn new() -> Self {
        Self {
            banks: [[DiscreteState::Off; MAX_INPUT_CHANNELS]; 2],
            current: 1,
            events: [EventType::None; MAX_INPUT_CHANNELS],
            channel_count: 0,
        }
    }

    /// Resize to `count` channels.  Every stored state is reset to `Off`
    /// and every event to `None`.
    pub fn set_channel_count(&mut self, count: usize) -> Result<()> {
        if count > MAX_INPUT_CHANNELS {
            return Err(ControlError::TooManyChannels);
        }

        self.channel_count = count;
        for bank in &mut self.banks {
            bank.fill(DiscreteState::Off);
        }
        self.events.fill(EventType::None);
        debug!("event detector sized to {} channels", count);
        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Record this cycle's stable state for `channel`.
    pub fn set_input_state(&mut self, channel: usize, state: DiscreteState) -> Result<()> {
        self.check(channel)?;
        self.banks[self.current][channel] = state;
        Ok(())
    }

    /// Event computed by the most recent [`execute`](Self::execute).
    pub fn output_event(&self, channel: usize) -> Result<EventType> {
        self.check(channel)?;
        Ok(self.events[channel])
    }

    /// Compare previous and current banks, then flip them.
    pub fn execute(&mut self) {
        let previous = &self.banks[self.current ^ 1];
        let current = &self.banks[self.current];

        for ((event, &prev), &cur) in self.events[..self.channel_count]
            .iter_mut()
            .zip(previous.iter())
            .zip(current.iter())
        {
            *event = EventType::between(prev, cur);
        }

        self.current ^= 1;
    }

    fn check(&self, channel: usize) -> Result<()> {
        if channel < self.channel_count {
            Ok(())
        } else {
            Err(ControlError::InvalidChannelIndex)
        }
    }
}
