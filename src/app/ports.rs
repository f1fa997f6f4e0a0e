//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────┐ ──▶ OutputPort
//!  RuleSource ──▶ │  LightController │ ──▶ EventSender / GlobalOffSender
//!                 └──────────────────┘ ──▶ InputEventListener
//! ```
//!
//! The filter, detector and action manager are concrete types; only these
//! seams are dynamic.  Adapters are attached as boxed trait objects so the
//! controller can run with any subset of them missing.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{DiscreteState, EventType, Rule};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

pub trait InputPort {
    /// Latch every input once per cycle.  Buffered devices read the bus
    /// here; the per-channel getter then serves from the buffer.
    fn refresh(&mut self) {}

    /// Raw sample of one channel.  `None` on read failure or an unmapped
    /// channel; the core treats that as `Unknown` for this cycle.
    fn get_current_value(&self, channel: usize) -> Option<DiscreteState>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: core → hardware)
// ───────────────────────────────────────────────────────────────

pub trait OutputPort {
    /// Fire-and-forget.  Failures are the adapter's concern.
    fn set_current_value(&mut self, channel: usize, state: DiscreteState);

    /// Called once after every output of a cycle has been set.
    fn flush(&mut self) {}
}

/// Shared adapters: one board object often owns the bus for both
/// directions, one publisher often serves several ports.
impl<T: InputPort> InputPort for Rc<RefCell<T>> {
    fn refresh(&mut self) {
        self.borrow_mut().refresh();
    }

    fn get_current_value(&self, channel: usize) -> Option<DiscreteState> {
        self.borrow().get_current_value(channel)
    }
}

impl<T: OutputPort> OutputPort for Rc<RefCell<T>> {
    fn set_current_value(&mut self, channel: usize, state: DiscreteState) {
        self.borrow_mut().set_current_value(channel, state);
    }

    fn flush(&mut self) {
        self.borrow_mut().flush();
    }
}

// ───────────────────────────────────────────────────────────────
// Rule source
// ───────────────────────────────────────────────────────────────

/// Why [`RuleSource::read_rule`] produced no rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleReadError {
    /// Source exhausted.
    NoData,
    /// The entry could not be parsed.  Loading continues.
    Malformed,
    /// Comment or blank entry.
    Skipped,
}

impl fmt::Display for RuleReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "no data"),
            Self::Malformed => write!(f, "malformed rule"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

pub trait RuleSource {
    /// Rewind to the first rule.  `false` if the source is unusable.
    fn reset(&mut self) -> bool;

    fn has_more_rules(&self) -> bool;

    fn read_rule(&mut self) -> Result<Rule, RuleReadError>;
}

// ───────────────────────────────────────────────────────────────
// Event sinks (core → network / logging)
// ───────────────────────────────────────────────────────────────

/// Receives the batch of detected events once per cycle.  `begin` and
/// `end` bracket every cycle, even one without events.
pub trait EventSender {
    fn begin_send_events(&mut self);
    fn send_event(&mut self, channel: usize, event: EventType);
    fn end_send_events(&mut self);
}

/// Pulsed once for every cycle in which a global-off happened.
pub trait GlobalOffSender {
    fn send_global_off(&mut self);
}

impl<T: EventSender> EventSender for Rc<RefCell<T>> {
    fn begin_send_events(&mut self) {
        self.borrow_mut().begin_send_events();
    }

    fn send_event(&mut self, channel: usize, event: EventType) {
        self.borrow_mut().send_event(channel, event);
    }

    fn end_send_events(&mut self) {
        self.borrow_mut().end_send_events();
    }
}

impl<T: GlobalOffSender> GlobalOffSender for Rc<RefCell<T>> {
    fn send_global_off(&mut self) {
        self.borrow_mut().send_global_off();
    }
}

// ───────────────────────────────────────────────────────────────
// Listeners
// ───────────────────────────────────────────────────────────────

/// Synchronous per-event callback.  Runs inside the cycle; must not block.
pub trait InputEventListener {
    fn input_event_notification(&mut self, channel: usize, event: EventType);
}

impl<T: InputEventListener> InputEventListener for Rc<RefCell<T>> {
    fn input_event_notification(&mut self, channel: usize, event: EventType) {
        self.borrow_mut().input_event_notification(channel, event);
    }
}

/// Token returned by listener registration, needed to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub(crate) u32);
