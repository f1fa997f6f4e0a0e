//! Integration tests for `LightController` against mock adapters.

use lightctl::ControlError;
use lightctl::app::commands::{CommandQueue, ControlCommand};
use lightctl::app::ports::RuleReadError;
use lightctl::app::service::{LightController, MAX_LISTENERS};
use lightctl::config::ControllerConfig;
use lightctl::model::{ActionType, DiscreteState, EventType, MAX_RULES, Rule};

use crate::mock_hw::*;

use DiscreteState::{Off, On, Unknown};

struct Rig {
    ctl: LightController,
    inputs: Shared<MockInputs>,
    outputs: Shared<MockOutputs>,
    sender: Shared<RecordingSender>,
}

fn rig(rules: &[Rule]) -> Rig {
    let config = ControllerConfig::default();
    let inputs = shared(MockInputs::new(config.input_channel_count));
    let outputs = shared(MockOutputs::default());
    let sender = shared(RecordingSender::default());

    let mut ctl = LightController::new(config);
    ctl.set_input_device(inputs.clone());
    ctl.set_output_device(outputs.clone());
    ctl.set_event_sender(sender.clone());
    ctl.set_global_off_sender(sender.clone());
    assert_eq!(ctl.initialize(&mut VecRuleSource::rules(rules)), Ok(rules.len()));

    Rig { ctl, inputs, outputs, sender }
}

fn follow(input: usize, output: usize) -> [Rule; 2] {
    [
        Rule::new(input, EventType::Rise, output, ActionType::TurnOn),
        Rule::new(input, EventType::Fall, output, ActionType::TurnOff),
    ]
}

// ── Pipeline ──────────────────────────────────────────────────

#[test]
fn switch_drives_its_output() {
    let mut r = rig(&follow(0, 0));

    settle(&mut r.ctl);
    assert_eq!(r.ctl.input_state(0), Ok(Off));
    // Driven outputs are never left undefined.
    assert_eq!(r.ctl.output_state(0), Ok(Off));
    assert_eq!(r.outputs.borrow().last(0), Some(Off));

    switch_on(&mut r.ctl, &r.inputs, 0);
    assert_eq!(r.ctl.input_state(0), Ok(On));
    assert_eq!(r.ctl.output_state(0), Ok(On));
    assert_eq!(r.outputs.borrow().last(0), Some(On));
    assert_eq!(r.outputs.borrow().last(1), Some(Off));

    switch_off(&mut r.ctl);
    assert_eq!(r.ctl.input_state(0), Ok(Off));
    assert_eq!(r.outputs.borrow().last(0), Some(Off));

    let cycles = r.ctl.cycle_count() as usize;
    assert_eq!(r.inputs.borrow().refreshes, cycles);
    assert_eq!(r.outputs.borrow().flushes, cycles);
    assert_eq!(r.outputs.borrow().writes.len(), cycles * 8);
}

#[test]
fn inputs_stay_unknown_without_a_device() {
    let mut ctl = LightController::new(ControllerConfig::default());
    let rules = follow(0, 0);
    assert_eq!(ctl.initialize(&mut VecRuleSource::rules(&rules)), Ok(2));
    settle(&mut ctl);
    settle(&mut ctl);
    assert_eq!(ctl.input_state(0), Ok(Unknown));
    assert_eq!(ctl.output_state(0), Ok(Unknown));
}

#[test]
fn failed_read_rebaselines_the_channel() {
    let mut r = rig(&follow(2, 2));
    settle(&mut r.ctl);
    assert_eq!(r.ctl.input_state(2), Ok(Off));

    r.inputs.borrow_mut().set(2, None);
    r.ctl.execute(CYCLE_MS);
    r.inputs.borrow_mut().set(2, Some(Off));
    r.ctl.execute(CYCLE_MS);
    assert_eq!(r.ctl.input_state(2), Ok(Unknown));

    switch_off(&mut r.ctl);
    assert_eq!(r.ctl.input_state(2), Ok(Off));
    // Unknown transitions never produce events.
    assert!(r.sender.borrow().calls.iter().all(|c| !matches!(c, SenderCall::Event(..))));
}

// ── Event publishing ──────────────────────────────────────────

#[test]
fn every_cycle_is_bracketed() {
    let mut r = rig(&follow(3, 1));
    settle(&mut r.ctl);
    {
        let calls = &r.sender.borrow().calls;
        assert_eq!(calls.len(), 2 * r.ctl.cycle_count() as usize);
        assert!(calls.chunks(2).all(|c| c == [SenderCall::Begin, SenderCall::End]));
    }

    switch_on(&mut r.ctl, &r.inputs, 3);
    let calls = &r.sender.borrow().calls;
    assert_eq!(
        calls[calls.len() - 3..],
        [SenderCall::Begin, SenderCall::Event(3, EventType::Rise), SenderCall::End]
    );
}

#[test]
fn listeners_run_in_registration_order() {
    let mut r = rig(&follow(3, 1));
    let log: NotificationLog = shared(Vec::new());
    let a = r
        .ctl
        .register_listener(Box::new(TaggedListener { tag: "a", log: log.clone() }))
        .unwrap();
    r.ctl
        .register_listener(Box::new(TaggedListener { tag: "b", log: log.clone() }))
        .unwrap();
    assert_eq!(r.ctl.listener_count(), 2);

    settle(&mut r.ctl);
    switch_on(&mut r.ctl, &r.inputs, 3);
    assert_eq!(*log.borrow(), [("a", 3, EventType::Rise), ("b", 3, EventType::Rise)]);

    assert!(r.ctl.unregister_listener(a).is_some());
    assert!(r.ctl.unregister_listener(a).is_none());

    switch_off(&mut r.ctl);
    assert_eq!(log.borrow().last(), Some(&("b", 3, EventType::Fall)));
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn listener_table_is_capped() {
    let mut r = rig(&follow(0, 0));
    let log: NotificationLog = shared(Vec::new());
    for _ in 0..MAX_LISTENERS {
        r.ctl
            .register_listener(Box::new(TaggedListener { tag: "x", log: log.clone() }))
            .unwrap();
    }
    let extra = r.ctl.register_listener(Box::new(TaggedListener { tag: "y", log }));
    assert!(matches!(extra, Err(ControlError::TooManyListeners)));
}

// ── Global off ────────────────────────────────────────────────

#[test]
fn rule_driven_global_off_pulses_once() {
    let mut rules = follow(0, 0).to_vec();
    rules.push(Rule::new(1, EventType::Rise, 0, ActionType::GlobalOff));
    let mut r = rig(&rules);

    settle(&mut r.ctl);
    switch_on(&mut r.ctl, &r.inputs, 0);
    assert_eq!(r.ctl.output_state(0), Ok(On));

    switch_on(&mut r.ctl, &r.inputs, 1);
    assert!(r.ctl.is_global_off());
    assert_eq!(r.sender.borrow().global_offs, 1);
    for ch in 0..8 {
        assert_eq!(r.ctl.output_state(ch), Ok(Off));
    }

    r.ctl.execute(CYCLE_MS);
    assert!(!r.ctl.is_global_off());
    assert_eq!(r.sender.borrow().global_offs, 1);
}

#[test]
fn local_off_does_not_pulse_the_sender() {
    let mut r = rig(&follow(0, 0));
    r.ctl.force_output(4, On).unwrap();
    r.ctl.execute(CYCLE_MS);
    assert_eq!(r.ctl.output_state(4), Ok(On));

    r.ctl.force_local_off();
    r.ctl.execute(CYCLE_MS);
    assert!(r.ctl.is_local_off());
    assert_eq!(r.ctl.output_state(4), Ok(Off));
    assert_eq!(r.sender.borrow().global_offs, 0);
}

// ── Command queue ─────────────────────────────────────────────

#[test]
fn queued_commands_apply_before_the_next_cycle() {
    let mut r = rig(&follow(0, 0));
    let queue = CommandQueue::new();
    queue.submit(ControlCommand::ForceOutput { channel: 99, state: On }).unwrap();
    queue.submit(ControlCommand::ForceOutput { channel: 5, state: On }).unwrap();
    queue.submit(ControlCommand::GlobalOff).unwrap();
    queue.submit(ControlCommand::ForceOutput { channel: 6, state: On }).unwrap();

    assert_eq!(r.ctl.apply_commands(&queue), 3);
    assert!(queue.is_empty());

    // Global off wins over the overrides.
    r.ctl.execute(CYCLE_MS);
    assert_eq!(r.ctl.output_state(5), Ok(Off));
    assert_eq!(r.sender.borrow().global_offs, 1);

    queue.submit(ControlCommand::ForceOutput { channel: 5, state: On }).unwrap();
    r.ctl.apply_commands(&queue);
    r.ctl.execute(CYCLE_MS);
    assert_eq!(r.ctl.output_state(5), Ok(On));

    // No rule touches output 5, so the overridden value persists.
    r.ctl.execute(CYCLE_MS);
    assert_eq!(r.ctl.output_state(5), Ok(On));
}

// ── Initialization ────────────────────────────────────────────

#[test]
fn bad_rules_are_skipped() {
    let good = follow(0, 0);
    let mut source = VecRuleSource::new(vec![
        Ok(good[0]),
        Err(RuleReadError::Malformed),
        Err(RuleReadError::Skipped),
        Ok(good[1]),
    ]);
    let mut ctl = LightController::new(ControllerConfig::default());
    assert_eq!(ctl.initialize(&mut source), Ok(2));
    assert_eq!(ctl.rules(), good);
}

#[test]
fn reinitialize_replaces_rules_and_reports_empty_table() {
    let mut r = rig(&follow(0, 0));
    let mut source = VecRuleSource::new(vec![Err(RuleReadError::Malformed)]);
    assert_eq!(r.ctl.initialize(&mut source), Err(ControlError::NoRulesLoaded));
    assert_eq!(r.ctl.rule_count(), 0);

    settle(&mut r.ctl);
    switch_on(&mut r.ctl, &r.inputs, 0);
    assert_eq!(r.ctl.input_state(0), Ok(On));
    assert_eq!(r.ctl.output_state(0), Ok(Off));
}

#[test]
fn rule_table_overflow_keeps_first_rules() {
    let rules: Vec<Rule> = (0..MAX_RULES + 2)
        .map(|i| Rule::new(i % 16, EventType::Rise, i % 8, ActionType::Toggle))
        .collect();
    let mut ctl = LightController::new(ControllerConfig::default());
    assert_eq!(ctl.initialize(&mut VecRuleSource::rules(&rules)), Ok(MAX_RULES));
    assert_eq!(ctl.rules(), &rules[..MAX_RULES]);
    assert_eq!(ctl.add_rule(rules[0]), Err(ControlError::TooManyRules));

    ctl.clear_rules();
    assert_eq!(ctl.rule_count(), 0);
}

#[test]
fn out_of_range_channels_are_rejected() {
    let mut r = rig(&follow(0, 0));
    assert_eq!(r.ctl.input_state(16), Err(ControlError::InvalidChannelIndex));
    assert_eq!(r.ctl.output_state(8), Err(ControlError::InvalidChannelIndex));
    assert_eq!(r.ctl.force_output(8, On), Err(ControlError::InvalidChannelIndex));
}
