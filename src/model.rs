//! Shared data model: channel states, transition events, rule actions and
//! the rule record itself.
//!
//! These are plain `Copy` values passed between the filter, the detector,
//! the action manager and the external adapters.

use core::fmt;

/// Design cap on input channels.
pub const MAX_INPUT_CHANNELS: usize = 128;
/// Design cap on output channels.
pub const MAX_OUTPUT_CHANNELS: usize = 128;
/// Design cap on the rule table.
pub const MAX_RULES: usize = 128;

/// Tri-state logical level of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiscreteState {
    /// No valid reading yet, or an ambiguous classification.
    #[default]
    Unknown,
    On,
    Off,
}

impl DiscreteState {
    /// Upper-case label used in log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transition between two consecutive stable states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    #[default]
    None,
    /// off → on
    Rise,
    /// on → off
    Fall,
}

impl EventType {
    /// Classify the transition `previous → current`.
    ///
    /// Anything involving `Unknown` is `None`.
    pub const fn between(previous: DiscreteState, current: DiscreteState) -> Self {
        match (previous, current) {
            (DiscreteState::Off, DiscreteState::On) => Self::Rise,
            (DiscreteState::On, DiscreteState::Off) => Self::Fall,
            _ => Self::None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rise => "rise",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionType {
    #[default]
    None,
    TurnOn,
    TurnOff,
    Toggle,
    /// All outputs off; raises the local-off flag.
    LocalOff,
    /// All outputs off; raises the global-off flag.
    GlobalOff,
}

impl ActionType {
    /// `LocalOff` and `GlobalOff` act on every output and ignore the
    /// rule's output channel.
    pub const fn targets_all_outputs(self) -> bool {
        matches!(self, Self::LocalOff | Self::GlobalOff)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Toggle => "toggle",
            Self::LocalOff => "local_off",
            Self::GlobalOff => "global_off",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleCondition {
    pub input_channel: usize,
    pub event: EventType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleAction {
    pub output_channel: usize,
    pub action: ActionType,
}

/// One row of the rule table: when `condition` is observed, do `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rule {
    pub condition: RuleCondition,
    pub action: RuleAction,
}

impl Rule {
    pub const fn new(
        input_channel: usize,
        event: EventType,
        output_channel: usize,
        action: ActionType,
    ) -> Self {
        Self {
            condition: RuleCondition { input_channel, event },
            action: RuleAction { output_channel, action },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in{} {} -> out{} {}",
            self.condition.input_channel,
            self.condition.event,
            self.action.output_channel,
            self.action.action
        )
    }
}
