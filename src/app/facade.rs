//! Name-addressed control surface.
//!
//! [`NamedController`] pairs a [`LightController`] with the input and output
//! [`ChannelList`]s, so network handlers and consoles can work with
//! `"kitchen"` instead of channel 7.  The lists define the channel layout:
//! their lengths override the counts in the configuration.

use log::debug;

use crate::config::ControllerConfig;
use crate::defaults;
use crate::error::Result;
use crate::model::DiscreteState;
use crate::rules::{ChannelList, RuleParser, StandardResolvers, TextRuleReader};

use super::commands::CommandQueue;
use super::ports::{InputEventListener, ListenerHandle, RuleSource};
use super::service::LightController;

pub struct NamedController {
    controller: LightController,
    inputs: ChannelList,
    outputs: ChannelList,
}

impl NamedController {
    pub fn new(mut config: ControllerConfig, inputs: ChannelList, outputs: ChannelList) -> Self {
        config.input_channel_count = inputs.len();
        config.output_channel_count = outputs.len();
        Self {
            controller: LightController::new(config),
            inputs,
            outputs,
        }
    }

    /// Controller with the built-in sixteen inputs and eight outputs.
    pub fn with_default_channels(config: ControllerConfig) -> Result<Self> {
        Ok(Self::new(
            config,
            ChannelList::from_text(defaults::INPUTS_TEXT)?,
            ChannelList::from_text(defaults::OUTPUTS_TEXT)?,
        ))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn initialize(&mut self, rules: &mut dyn RuleSource) -> Result<usize> {
        self.controller.initialize(rules)
    }

    /// Initialize from rule text resolved against this controller's
    /// channel names.
    pub fn initialize_from_text(&mut self, rules_text: &str) -> Result<usize> {
        let parser = RuleParser::new(
            &self.inputs,
            &self.outputs,
            &StandardResolvers,
            &StandardResolvers,
        );
        let mut reader = TextRuleReader::new(rules_text, parser);
        self.controller.initialize(&mut reader)
    }

    pub fn execute(&mut self, elapsed_ms: u32) {
        self.controller.execute(elapsed_ms);
    }

    pub fn apply_commands(&mut self, queue: &CommandQueue) -> usize {
        self.controller.apply_commands(queue)
    }

    // ── Channels ──────────────────────────────────────────────

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_name(&self, index: usize) -> Option<&str> {
        self.inputs.name(index)
    }

    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.outputs.name(index)
    }

    pub fn input_exists(&self, name: &str) -> bool {
        self.inputs.resolve(name).is_some()
    }

    pub fn output_exists(&self, name: &str) -> bool {
        self.outputs.resolve(name).is_some()
    }

    pub fn input_channels(&self) -> &ChannelList {
        &self.inputs
    }

    pub fn output_channels(&self) -> &ChannelList {
        &self.outputs
    }

    // ── State ─────────────────────────────────────────────────

    /// `Unknown` for a name that is not in the list.
    pub fn input_state(&self, name: &str) -> DiscreteState {
        self.inputs
            .resolve(name)
            .and_then(|ch| self.controller.input_state(ch).ok())
            .unwrap_or_default()
    }

    /// `Unknown` for a name that is not in the list.
    pub fn output_state(&self, name: &str) -> DiscreteState {
        self.outputs
            .resolve(name)
            .and_then(|ch| self.controller.output_state(ch).ok())
            .unwrap_or_default()
    }

    /// Stage an override for the named output.  `false` if the name is
    /// unknown.
    pub fn set_output_state(&mut self, name: &str, state: DiscreteState) -> bool {
        let Some(channel) = self.outputs.resolve(name) else {
            debug!("no output named {:?}", name);
            return false;
        };
        self.controller.force_output(channel, state).is_ok()
    }

    pub fn local_off(&mut self) {
        self.controller.force_local_off();
    }

    pub fn global_off(&mut self) {
        self.controller.force_global_off();
    }

    // ── Listeners ─────────────────────────────────────────────

    pub fn register_listener(
        &mut self,
        listener: Box<dyn InputEventListener>,
    ) -> Result<ListenerHandle> {
        self.controller.register_listener(listener)
    }

    pub fn unregister_listener(
        &mut self,
        handle: ListenerHandle,
    ) -> Option<Box<dyn InputEventListener>> {
        self.controller.unregister_listener(handle)
    }

    // ── Access ────────────────────────────────────────────────

    pub fn controller(&self) -> &LightController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LightController {
        &mut self.controller
    }
}
