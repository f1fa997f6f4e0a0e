//! Light controller orchestrator.
//!
//! [`LightController`] owns one [`InputFilter`] per input, the
//! [`EventDetector`] and the [`ActionManager`], and runs them once per
//! [`execute`](LightController::execute) call.  Everything outside the core
//! is reached through the port traits in [`ports`](super::ports); any port
//! may be left unattached.
//!
//! ```text
//!  InputPort ──▶ filters ──▶ detector ──▶ listeners
//!                                    └──▶ actions ──▶ OutputPort
//!                                                └──▶ EventSender
//!                                                └──▶ GlobalOffSender
//! ```
//!
//! Execution is single-threaded: external writers go through the
//! [`CommandQueue`], drained by [`apply_commands`](LightController::apply_commands)
//! between cycles.

use heapless::Vec;
use log::{debug, info, warn};

use crate::actions::ActionManager;
use crate::config::ControllerConfig;
use crate::detector::EventDetector;
use crate::error::{ControlError, Result};
use crate::filter::InputFilter;
use crate::model::{DiscreteState, EventType, MAX_INPUT_CHANNELS, MAX_OUTPUT_CHANNELS, Rule};

use super::commands::{CommandQueue, ControlCommand};
use super::ports::{
    EventSender, GlobalOffSender, InputEventListener, InputPort, ListenerHandle, OutputPort,
    RuleReadError, RuleSource,
};

/// Listener table capacity.
pub const MAX_LISTENERS: usize = 8;

type ListenerSlot = (ListenerHandle, Box<dyn InputEventListener>);

// ───────────────────────────────────────────────────────────────
// LightController
// ───────────────────────────────────────────────────────────────

pub struct LightController {
    config: ControllerConfig,

    // -- Core components --
    filters: Vec<InputFilter, MAX_INPUT_CHANNELS>,
    detector: EventDetector,
    actions: ActionManager,

    // -- Latest observable states --
    input_states: Vec<DiscreteState, MAX_INPUT_CHANNELS>,
    output_states: Vec<DiscreteState, MAX_OUTPUT_CHANNELS>,

    // -- Ports --
    input_device: Option<Box<dyn InputPort>>,
    output_device: Option<Box<dyn OutputPort>>,
    event_sender: Option<Box<dyn EventSender>>,
    global_off_sender: Option<Box<dyn GlobalOffSender>>,
    listeners: Vec<ListenerSlot, MAX_LISTENERS>,
    next_listener_id: u32,

    cycle_count: u64,
}

impl LightController {
    /// Construct the controller from configuration.
    ///
    /// No channels exist until [`initialize`](Self::initialize) runs.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            filters: Vec::new(),
            detector: EventDetector::new(),
            actions: ActionManager::new(),
            input_states: Vec::new(),
            output_states: Vec::new(),
            input_device: None,
            output_device: None,
            event_sender: None,
            global_off_sender: None,
            listeners: Vec::new(),
            next_listener_id: 0,
            cycle_count: 0,
        }
    }

    // ── Ports ─────────────────────────────────────────────────

    pub fn set_input_device(&mut self, device: impl InputPort + 'static) {
        self.input_device = Some(Box::new(device));
    }

    pub fn set_output_device(&mut self, device: impl OutputPort + 'static) {
        self.output_device = Some(Box::new(device));
    }

    pub fn set_event_sender(&mut self, sender: impl EventSender + 'static) {
        self.event_sender = Some(Box::new(sender));
    }

    pub fn set_global_off_sender(&mut self, sender: impl GlobalOffSender + 'static) {
        self.global_off_sender = Some(Box::new(sender));
    }

    /// Add a listener at the end of the notification order.
    pub fn register_listener(
        &mut self,
        listener: Box<dyn InputEventListener>,
    ) -> Result<ListenerHandle> {
        let handle = ListenerHandle(self.next_listener_id);
        self.listeners
            .push((handle, listener))
            .map_err(|_| ControlError::TooManyListeners)?;
        self.next_listener_id = self.next_listener_id.wrapping_add(1);
        Ok(handle)
    }

    /// Remove a listener and hand it back.  `None` for a stale handle.
    pub fn unregister_listener(
        &mut self,
        handle: ListenerHandle,
    ) -> Option<Box<dyn InputEventListener>> {
        let index = self.listeners.iter().position(|(h, _)| *h == handle)?;
        Some(self.listeners.remove(index).1)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Size every component to the configured channel counts and load the
    /// rule table from `rules`, replacing any previous rules.
    ///
    /// Returns the number of rules loaded.  On error the controller still
    /// runs: oversized channel counts leave it with no channels, and an
    /// empty rule table just means no rule ever fires.
    pub fn initialize(&mut self, rules: &mut dyn RuleSource) -> Result<usize> {
        let sized = self.configure_channels();
        let loaded = self.load_rules(rules);
        sized?;

        if loaded == 0 {
            warn!("no rules loaded");
            return Err(ControlError::NoRulesLoaded);
        }
        info!(
            "controller ready: {} inputs, {} outputs, {} rules",
            self.input_channel_count(),
            self.output_channel_count(),
            loaded
        );
        Ok(loaded)
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle: read → filter → detect → act → write → notify.
    pub fn execute(&mut self, elapsed_ms: u32) {
        self.cycle_count = self.cycle_count.wrapping_add(1);

        self.sample_inputs(elapsed_ms);
        self.detect_events();
        self.dispatch_events();
        self.actions.execute();
        self.write_outputs();
        self.send_events();

        if self.actions.is_global_off() {
            info!("global off");
            if let Some(sender) = self.global_off_sender.as_mut() {
                sender.send_global_off();
            }
        }
    }

    /// Drain `queue` and stage every command for the next cycle.
    ///
    /// Returns the number of commands staged; rejected ones are logged.
    pub fn apply_commands(&mut self, queue: &CommandQueue) -> usize {
        let mut staged = 0;
        while let Some(command) = queue.take() {
            match self.stage(command) {
                Ok(()) => staged += 1,
                Err(e) => warn!("dropping {:?}: {}", command, e),
            }
        }
        staged
    }

    // ── Staging ───────────────────────────────────────────────

    /// Override one output for the next cycle.
    pub fn force_output(&mut self, channel: usize, state: DiscreteState) -> Result<()> {
        self.actions.force_output(channel, state)?;
        debug!("output {} forced {}", channel, state);
        Ok(())
    }

    pub fn force_local_off(&mut self) {
        self.actions.force_local_off();
    }

    pub fn force_global_off(&mut self) {
        self.actions.force_global_off();
    }

    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        self.actions.add_rule(rule)
    }

    pub fn clear_rules(&mut self) {
        self.actions.clear_rules();
    }

    // ── Queries ───────────────────────────────────────────────

    /// Stable state of an input after the last cycle.
    pub fn input_state(&self, channel: usize) -> Result<DiscreteState> {
        self.input_states
            .get(channel)
            .copied()
            .ok_or(ControlError::InvalidChannelIndex)
    }

    /// State last written for an output.
    pub fn output_state(&self, channel: usize) -> Result<DiscreteState> {
        self.output_states
            .get(channel)
            .copied()
            .ok_or(ControlError::InvalidChannelIndex)
    }

    pub fn input_channel_count(&self) -> usize {
        self.input_states.len()
    }

    pub fn output_channel_count(&self) -> usize {
        self.output_states.len()
    }

    pub fn rules(&self) -> &[Rule] {
        self.actions.rules()
    }

    pub fn rule_count(&self) -> usize {
        self.actions.rule_count()
    }

    pub fn is_local_off(&self) -> bool {
        self.actions.is_local_off()
    }

    pub fn is_global_off(&self) -> bool {
        self.actions.is_global_off()
    }

    /// Cycles executed since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn configure_channels(&mut self) -> Result<()> {
        let mut inputs = self.config.input_channel_count;
        let mut outputs = self.config.output_channel_count;
        let fits = inputs <= MAX_INPUT_CHANNELS && outputs <= MAX_OUTPUT_CHANNELS;
        if !fits {
            warn!(
                "{} inputs / {} outputs exceed the channel cap, running without channels",
                inputs, outputs
            );
            inputs = 0;
            outputs = 0;
        }

        self.detector.set_channel_count(inputs)?;
        self.actions.set_input_channel_count(inputs)?;
        self.actions.set_output_channel_count(outputs)?;

        let filter = InputFilter::from_config(&self.config.filter);
        self.filters.clear();
        self.filters
            .resize(inputs, filter)
            .map_err(|()| ControlError::TooManyChannels)?;
        self.input_states.clear();
        self.input_states
            .resize(inputs, DiscreteState::Unknown)
            .map_err(|()| ControlError::TooManyChannels)?;
        self.output_states.clear();
        self.output_states
            .resize(outputs, DiscreteState::Unknown)
            .map_err(|()| ControlError::TooManyChannels)?;

        if fits { Ok(()) } else { Err(ControlError::TooManyChannels) }
    }

    fn load_rules(&mut self, source: &mut dyn RuleSource) -> usize {
        self.actions.clear_rules();
        if !source.reset() {
            warn!("rule source unavailable");
            return 0;
        }

        let mut rejected = 0usize;
        while source.has_more_rules() {
            match source.read_rule() {
                Ok(rule) => {
                    if self.actions.add_rule(rule).is_err() {
                        warn!("rule table full, ignoring {} and the rest", rule);
                        break;
                    }
                    debug!("rule {}: {}", self.actions.rule_count() - 1, rule);
                }
                Err(RuleReadError::Skipped) => {}
                Err(RuleReadError::Malformed) => rejected += 1,
                Err(RuleReadError::NoData) => break,
            }
        }

        let loaded = self.actions.rule_count();
        info!("{} rules loaded, {} rejected", loaded, rejected);
        loaded
    }

    fn sample_inputs(&mut self, elapsed_ms: u32) {
        if let Some(device) = self.input_device.as_mut() {
            device.refresh();
        }
        let device = self.input_device.as_deref();
        for (channel, filter) in self.filters.iter_mut().enumerate() {
            let raw = device
                .and_then(|d| d.get_current_value(channel))
                .unwrap_or(DiscreteState::Unknown);
            filter.update(raw, elapsed_ms);
        }
    }

    fn detect_events(&mut self) {
        for (channel, (filter, latest)) in self
            .filters
            .iter()
            .zip(self.input_states.iter_mut())
            .enumerate()
        {
            let state = filter.resulting_state();
            *latest = state;
            if let Err(e) = self.detector.set_input_state(channel, state) {
                warn!("input {} not recorded by the detector: {}", channel, e);
            }
        }
        self.detector.execute();
    }

    fn dispatch_events(&mut self) {
        for channel in 0..self.detector.channel_count() {
            let event = self.event(channel);
            if event == EventType::None {
                continue;
            }
            info!("input {} {}", channel, event);
            for (_, listener) in self.listeners.iter_mut() {
                listener.input_event_notification(channel, event);
            }
            if let Err(e) = self.actions.set_input_event(channel, event) {
                warn!("input {} {} not staged for rules: {}", channel, event, e);
            }
        }
    }

    fn write_outputs(&mut self) {
        for (channel, latest) in self.output_states.iter_mut().enumerate() {
            let mut state = self
                .actions
                .output_state(channel)
                .unwrap_or(DiscreteState::Unknown);

            // A driven output is never left undefined.
            if let Some(device) = self.output_device.as_mut() {
                if state == DiscreteState::Unknown {
                    state = DiscreteState::Off;
                }
                device.set_current_value(channel, state);
            }

            if *latest != state {
                info!("output {} -> {}", channel, state);
                *latest = state;
            }
        }
        if let Some(device) = self.output_device.as_mut() {
            device.flush();
        }
    }

    fn send_events(&mut self) {
        let Some(sender) = self.event_sender.as_mut() else {
            return;
        };
        sender.begin_send_events();
        for channel in 0..self.detector.channel_count() {
            let event = self.detector.output_event(channel).unwrap_or(EventType::None);
            if event != EventType::None {
                sender.send_event(channel, event);
            }
        }
        sender.end_send_events();
    }

    fn event(&self, channel: usize) -> EventType {
        self.detector.output_event(channel).unwrap_or(EventType::None)
    }

    fn stage(&mut self, command: ControlCommand) -> Result<()> {
        match command {
            ControlCommand::ForceOutput { channel, state } => self.force_output(channel, state),
            ControlCommand::LocalOff => {
                self.force_local_off();
                Ok(())
            }
            ControlCommand::GlobalOff => {
                self.force_global_off();
                Ok(())
            }
        }
    }
}
