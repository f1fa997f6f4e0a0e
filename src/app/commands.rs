//! Inbound commands to the controller.
//!
//! External producers (network handlers, a console, a scheduler) never touch
//! the control core directly.  They post a [`ControlCommand`] into the
//! [`CommandQueue`]; the driver loop drains it right before each cycle via
//! [`LightController::apply_commands`](super::service::LightController::apply_commands),
//! so staged overrides are never applied in the middle of a cycle.
//!
//! ```text
//! ┌──────────────┐ ControlCommand ┌──────────────┐
//! │   Producer   │───────────────▶│  Cycle loop  │
//! └──────────────┘   (bounded)    └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::error::{ControlError, Result};
use crate::model::DiscreteState;

/// Staging requests that may arrive from outside the cycle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Override one output for the next cycle only.
    ForceOutput { channel: usize, state: DiscreteState },
    /// Turn every output off for the next cycle.
    LocalOff,
    /// Turn every output off and pulse the global-off sender.
    GlobalOff,
}

/// Queue depth.
pub const COMMAND_DEPTH: usize = 16;

/// Bounded single-consumer command queue.
pub struct CommandQueue {
    channel: Channel<CriticalSectionRawMutex, ControlCommand, COMMAND_DEPTH>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    /// `const` so the firmware can keep one in a `static`.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking.  A full queue drops the command.
    pub fn submit(&self, command: ControlCommand) -> Result<()> {
        self.channel.try_send(command).map_err(|_| {
            warn!("command queue full, dropping {:?}", command);
            ControlError::QueueFull
        })
    }

    /// Pop the oldest pending command.
    pub fn take(&self) -> Option<ControlCommand> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
