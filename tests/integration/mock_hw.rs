//! Mock adapters for integration tests.
//!
//! Every mock records what the controller did to it so tests can assert on
//! the full call history.  Share a mock with the controller through
//! `Rc<RefCell<_>>`; the port traits are implemented for that wrapper.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use lightctl::app::ports::{
    EventSender, GlobalOffSender, InputEventListener, InputPort, OutputPort, RuleReadError,
    RuleSource,
};
use lightctl::app::service::LightController;
use lightctl::model::{DiscreteState, EventType, Rule};

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

// ── Inputs ────────────────────────────────────────────────────

/// Raw input levels; `None` simulates a failed read.
pub struct MockInputs {
    pub values: Vec<Option<DiscreteState>>,
    pub refreshes: usize,
}

#[allow(dead_code)]
impl MockInputs {
    pub fn new(channels: usize) -> Self {
        Self {
            values: vec![Some(DiscreteState::Off); channels],
            refreshes: 0,
        }
    }

    pub fn set(&mut self, channel: usize, value: Option<DiscreteState>) {
        self.values[channel] = value;
    }

    pub fn toggle(&mut self, channel: usize) {
        let next = match self.values[channel] {
            Some(DiscreteState::On) => DiscreteState::Off,
            _ => DiscreteState::On,
        };
        self.values[channel] = Some(next);
    }
}

impl InputPort for MockInputs {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn get_current_value(&self, channel: usize) -> Option<DiscreteState> {
        self.values.get(channel).copied().flatten()
    }
}

// ── Outputs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOutputs {
    pub writes: Vec<(usize, DiscreteState)>,
    pub flushes: usize,
}

#[allow(dead_code)]
impl MockOutputs {
    /// Last value written to `channel`.
    pub fn last(&self, channel: usize) -> Option<DiscreteState> {
        self.writes
            .iter()
            .rev()
            .find(|(ch, _)| *ch == channel)
            .map(|(_, s)| *s)
    }
}

impl OutputPort for MockOutputs {
    fn set_current_value(&mut self, channel: usize, state: DiscreteState) {
        self.writes.push((channel, state));
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

// ── Senders ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderCall {
    Begin,
    Event(usize, EventType),
    End,
}

#[derive(Default)]
pub struct RecordingSender {
    pub calls: Vec<SenderCall>,
    pub global_offs: usize,
}

impl EventSender for RecordingSender {
    fn begin_send_events(&mut self) {
        self.calls.push(SenderCall::Begin);
    }

    fn send_event(&mut self, channel: usize, event: EventType) {
        self.calls.push(SenderCall::Event(channel, event));
    }

    fn end_send_events(&mut self) {
        self.calls.push(SenderCall::End);
    }
}

impl GlobalOffSender for RecordingSender {
    fn send_global_off(&mut self) {
        self.global_offs += 1;
    }
}

// ── Listeners ─────────────────────────────────────────────────

pub type NotificationLog = Shared<Vec<(&'static str, usize, EventType)>>;

/// Appends `(tag, channel, event)` to a log shared by several listeners.
pub struct TaggedListener {
    pub tag: &'static str,
    pub log: NotificationLog,
}

impl InputEventListener for TaggedListener {
    fn input_event_notification(&mut self, channel: usize, event: EventType) {
        self.log.borrow_mut().push((self.tag, channel, event));
    }
}

// ── Rule source ───────────────────────────────────────────────

/// Replays a fixed list of read results.
pub struct VecRuleSource {
    items: Vec<Result<Rule, RuleReadError>>,
    pos: usize,
}

impl VecRuleSource {
    pub fn new(items: Vec<Result<Rule, RuleReadError>>) -> Self {
        Self { items, pos: 0 }
    }

    pub fn rules(rules: &[Rule]) -> Self {
        Self::new(rules.iter().copied().map(Ok).collect())
    }
}

impl RuleSource for VecRuleSource {
    fn reset(&mut self) -> bool {
        self.pos = 0;
        true
    }

    fn has_more_rules(&self) -> bool {
        self.pos < self.items.len()
    }

    fn read_rule(&mut self) -> Result<Rule, RuleReadError> {
        let item = self.items.get(self.pos).copied().unwrap_or(Err(RuleReadError::NoData));
        self.pos += 1;
        item
    }
}

// ── I2C bus ───────────────────────────────────────────────────

#[derive(Default)]
pub struct BusState {
    /// Byte returned by a read, per address.
    pub pins: HashMap<u8, u8>,
    /// Every byte written, with its address.
    pub writes: Vec<(u8, u8)>,
    /// Addresses that do not acknowledge.
    pub absent: HashSet<u8>,
}

/// Cloneable handle; the test keeps one clone, the board owns another.
#[derive(Clone, Default)]
pub struct MockBus(pub Shared<BusState>);

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pins(&self, address: u8, value: u8) {
        self.0.borrow_mut().pins.insert(address, value);
    }

    pub fn set_absent(&self, address: u8, absent: bool) {
        let mut state = self.0.borrow_mut();
        if absent {
            state.absent.insert(address);
        } else {
            state.absent.remove(&address);
        }
    }

    pub fn last_write(&self, address: u8) -> Option<u8> {
        self.0
            .borrow()
            .writes
            .iter()
            .rev()
            .find(|(a, _)| *a == address)
            .map(|(_, v)| *v)
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.absent.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    let value = state.pins.get(&address).copied().unwrap_or(0xFF);
                    buf.fill(value);
                }
                Operation::Write(bytes) => {
                    for &b in bytes.iter() {
                        state.writes.push((address, b));
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Cycle helpers ─────────────────────────────────────────────

/// Cycle length used by the helpers.
pub const CYCLE_MS: u32 = 5;
/// Cycles in one 75 ms filter window.
pub const WINDOW_CYCLES: usize = 15;

/// Run enough steady cycles for every input to classify `Off`.
#[allow(dead_code)]
pub fn settle(ctl: &mut LightController) {
    // One baseline cycle plus one full window.
    for _ in 0..=WINDOW_CYCLES {
        ctl.execute(CYCLE_MS);
    }
}

/// Toggle `channel` every cycle for one window, so it classifies `On`.
#[allow(dead_code)]
pub fn switch_on(ctl: &mut LightController, inputs: &Shared<MockInputs>, channel: usize) {
    for _ in 0..WINDOW_CYCLES {
        inputs.borrow_mut().toggle(channel);
        ctl.execute(CYCLE_MS);
    }
}

/// Hold every input steady for one window, so toggling ones classify `Off`.
#[allow(dead_code)]
pub fn switch_off(ctl: &mut LightController) {
    for _ in 0..WINDOW_CYCLES {
        ctl.execute(CYCLE_MS);
    }
}
