//! Rule evaluation and the output-state machine.
//!
//! The [`ActionManager`] owns the bounded rule table and the output vector.
//! Per cycle it receives the detected input events plus any externally
//! staged overrides, then [`execute`](ActionManager::execute) runs:
//!
//! 1. clear last cycle's local/global-off flags
//! 2. evaluate rules in insertion order
//! 3. apply the forced-output overlay
//! 4. staged local-off → all outputs off, raise `is_local_off`
//! 5. staged global-off → all outputs off, raise `is_global_off`
//! 6. drop staged overrides, latches and consumed events
//!
//! Later rules win over earlier rules on the same output; overrides win
//! over rules; the off latches win over everything.

use heapless::Vec;
use log::{debug, warn};

use crate::error::{ControlError, Result};
use crate::model::{
    ActionType, DiscreteState, EventType, MAX_INPUT_CHANNELS, MAX_OUTPUT_CHANNELS, MAX_RULES,
    Rule, RuleAction, RuleCondition,
};

pub struct ActionManager {
    // -- Staged per-cycle inputs --
    input_events: Vec<EventType, MAX_INPUT_CHANNELS>,
    forced_outputs: Vec<DiscreteState, MAX_OUTPUT_CHANNELS>,
    local_off_requested: bool,
    global_off_requested: bool,

    // -- Outputs of the last completed cycle --
    outputs: Vec<DiscreteState, MAX_OUTPUT_CHANNELS>,
    local_off: bool,
    global_off: bool,

    rules: Vec<Rule, MAX_RULES>,
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionManager {
    pub fn new() -> Self {
        Self {
            input_events: Vec::new(),
            forced_outputs: Vec::new(),
            local_off_requested: false,
            global_off_requested: false,
            outputs: Vec::new(),
            local_off: false,
            global_off: false,
            rules: Vec::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Resize the input-event table.  Pending events are cleared.
    pub fn set_input_channel_count(&mut self, count: usize) -> Result<()> {
        if count > MAX_INPUT_CHANNELS {
            return Err(ControlError::TooManyChannels);
        }
        self.input_events.clear();
        self.input_events
            .resize(count, EventType::None)
            .map_err(|()| ControlError::TooManyChannels)
    }

    /// Resize the output vector.  Surviving outputs keep their state, new
    /// ones start `Unknown`; staged overrides and latches are cleared.
    pub fn set_output_channel_count(&mut self, count: usize) -> Result<()> {
        if count > MAX_OUTPUT_CHANNELS {
            return Err(ControlError::TooManyChannels);
        }
        self.outputs
            .resize(count, DiscreteState::Unknown)
            .map_err(|()| ControlError::TooManyChannels)?;
        self.forced_outputs.clear();
        self.forced_outputs
            .resize(count, DiscreteState::Unknown)
            .map_err(|()| ControlError::TooManyChannels)?;
        self.reset_staged_overrides();
        Ok(())
    }

    pub fn input_channel_count(&self) -> usize {
        self.input_events.len()
    }

    pub fn output_channel_count(&self) -> usize {
        self.outputs.len()
    }

    /// Append a rule.  Fails once the table holds [`MAX_RULES`] entries.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        self.rules.push(rule).map_err(|_| ControlError::TooManyRules)
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    // ── Per-cycle staging ─────────────────────────────────────

    /// Stage the detected event for an input.  Last write wins.
    pub fn set_input_event(&mut self, channel: usize, event: EventType) -> Result<()> {
        let slot = self
            .input_events
            .get_mut(channel)
            .ok_or(ControlError::InvalidChannelIndex)?;
        *slot = event;
        Ok(())
    }

    /// Stage an override for one output.  `Unknown` means "no override".
    pub fn force_output(&mut self, channel: usize, state: DiscreteState) -> Result<()> {
        let slot = self
            .forced_outputs
            .get_mut(channel)
            .ok_or(ControlError::InvalidChannelIndex)?;
        *slot = state;
        Ok(())
    }

    pub fn force_local_off(&mut self) {
        self.local_off_requested = true;
    }

    pub fn force_global_off(&mut self) {
        self.global_off_requested = true;
    }

    // ── Results ───────────────────────────────────────────────

    pub fn output_state(&self, channel: usize) -> Result<DiscreteState> {
        self.outputs
            .get(channel)
            .copied()
            .ok_or(ControlError::InvalidChannelIndex)
    }

    /// True iff the last completed cycle performed a local-off.
    pub fn is_local_off(&self) -> bool {
        self.local_off
    }

    /// True iff the last completed cycle performed a global-off.
    pub fn is_global_off(&self) -> bool {
        self.global_off
    }

    // ── Cycle ─────────────────────────────────────────────────

    pub fn execute(&mut self) {
        self.local_off = false;
        self.global_off = false;

        self.apply_rules();
        self.apply_forced_outputs();

        if self.local_off_requested {
            self.execute_local_off();
        }
        if self.global_off_requested {
            self.execute_global_off();
        }

        self.reset_staged_overrides();
        self.input_events.fill(EventType::None);
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_rules(&mut self) {
        // Indexing keeps the borrow of `rules` disjoint from the outputs.
        for i in 0..self.rules.len() {
            let rule = self.rules[i];
            if !self.condition_matches(&rule.condition) {
                continue;
            }
            if self.execute_action(&rule.action).is_err() {
                warn!("rule {} ({}) targets a missing output, ignored", i, rule);
            }
        }
    }

    fn condition_matches(&self, condition: &RuleCondition) -> bool {
        if condition.event == EventType::None {
            return false;
        }
        self.input_events
            .get(condition.input_channel)
            .is_some_and(|&event| event == condition.event)
    }

    fn execute_action(&mut self, action: &RuleAction) -> Result<()> {
        match action.action {
            ActionType::None => Ok(()),
            ActionType::LocalOff => {
                self.execute_local_off();
                Ok(())
            }
            ActionType::GlobalOff => {
                self.execute_global_off();
                Ok(())
            }
            ActionType::TurnOn | ActionType::TurnOff | ActionType::Toggle => {
                let out = self
                    .outputs
                    .get_mut(action.output_channel)
                    .ok_or(ControlError::InvalidChannelIndex)?;
                *out = match (action.action, *out) {
                    (ActionType::TurnOn, _) => DiscreteState::On,
                    (ActionType::Toggle, DiscreteState::Off) => DiscreteState::On,
                    // TurnOff, and Toggle from On or from Unknown
                    _ => DiscreteState::Off,
                };
                Ok(())
            }
        }
    }

    fn apply_forced_outputs(&mut self) {
        for (out, &forced) in self.outputs.iter_mut().zip(self.forced_outputs.iter()) {
            if forced != DiscreteState::Unknown {
                *out = forced;
            }
        }
    }

    fn execute_local_off(&mut self) {
        debug!("local off: all outputs off");
        self.outputs.fill(DiscreteState::Off);
        self.local_off = true;
    }

    fn execute_global_off(&mut self) {
        debug!("global off: all outputs off");
        self.outputs.fill(DiscreteState::Off);
        self.global_off = true;
    }

    fn reset_staged_overrides(&mut self) {
        self.local_off_requested = false;
        self.global_off_requested = false;
        self.forced_outputs.fill(DiscreteState::Unknown);
    }
}
