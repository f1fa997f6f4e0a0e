//! Rule line parser: `INPUT EVENT OUTPUT ACTION`.
//!
//! Words are separated by spaces, tabs, CR or LF; words past the fourth are
//! ignored.  Every problem found on a line is collected into a
//! [`RuleFaults`] mask instead of stopping at the first one.

use core::fmt;

use crate::model::{ActionType, EventType, Rule};

use super::{ActionNameResolver, ChannelNameResolver, EventNameResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RuleFault {
    /// Fewer than four words.
    ParsingError = 0b0000_0001,
    InvalidInput = 0b0000_0010,
    InvalidEvent = 0b0000_0100,
    InvalidOutput = 0b0000_1000,
    InvalidAction = 0b0001_0000,
}

impl RuleFault {
    pub const ALL: [RuleFault; 5] = [
        Self::ParsingError,
        Self::InvalidInput,
        Self::InvalidEvent,
        Self::InvalidOutput,
        Self::InvalidAction,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RuleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParsingError => write!(f, "syntax error"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::InvalidEvent => write!(f, "invalid event"),
            Self::InvalidOutput => write!(f, "invalid output"),
            Self::InvalidAction => write!(f, "invalid action"),
        }
    }
}

/// Set of [`RuleFault`]s found on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleFaults(u8);

impl RuleFaults {
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, fault: RuleFault) -> bool {
        self.0 & fault.mask() != 0
    }

    pub fn insert(&mut self, fault: RuleFault) {
        self.0 |= fault.mask();
    }

    pub fn remove(&mut self, fault: RuleFault) {
        self.0 &= !fault.mask();
    }

    pub fn iter(self) -> impl Iterator<Item = RuleFault> {
        RuleFault::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for RuleFaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fault) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{fault}")?;
        }
        Ok(())
    }
}

pub struct RuleParser<'a> {
    inputs: &'a dyn ChannelNameResolver,
    outputs: &'a dyn ChannelNameResolver,
    events: &'a dyn EventNameResolver,
    actions: &'a dyn ActionNameResolver,
}

impl<'a> RuleParser<'a> {
    pub fn new(
        inputs: &'a dyn ChannelNameResolver,
        outputs: &'a dyn ChannelNameResolver,
        events: &'a dyn EventNameResolver,
        actions: &'a dyn ActionNameResolver,
    ) -> Self {
        Self {
            inputs,
            outputs,
            events,
            actions,
        }
    }

    pub fn parse(&self, line: &str) -> Result<Rule, RuleFaults> {
        let mut faults = RuleFaults::default();
        let mut rule = Rule::default();
        let mut words = line
            .split([' ', '\t', '\r', '\n'])
            .filter(|w| !w.is_empty());

        let [input, event, output, action] = [(); 4].map(|()| words.next());

        if let Some(word) = input {
            match self.inputs.resolve_channel(word) {
                Some(ch) => rule.condition.input_channel = ch,
                None => faults.insert(RuleFault::InvalidInput),
            }
        }
        if let Some(word) = event {
            match self.events.resolve_event(word) {
                Some(ev) => rule.condition.event = ev,
                None => faults.insert(RuleFault::InvalidEvent),
            }
        }
        if let Some(word) = output {
            match self.outputs.resolve_channel(word) {
                Some(ch) => rule.action.output_channel = ch,
                None => faults.insert(RuleFault::InvalidOutput),
            }
        }
        match action {
            Some(word) => match self.actions.resolve_action(word) {
                Some(act) => rule.action.action = act,
                None => faults.insert(RuleFault::InvalidAction),
            },
            None => faults.insert(RuleFault::ParsingError),
        }

        // The output field is ignored by these actions.
        if rule.action.action.targets_all_outputs() {
            faults.remove(RuleFault::InvalidOutput);
            rule.action.output_channel = 0;
        }

        if faults.is_empty() {
            debug_assert!(rule.condition.event != EventType::None);
            debug_assert!(rule.action.action != ActionType::None);
            Ok(rule)
        } else {
            Err(faults)
        }
    }
}
