//! Integration tests for the name-addressed `NamedController`.

use lightctl::app::facade::NamedController;
use lightctl::config::ControllerConfig;
use lightctl::model::{DiscreteState, EventType};
use lightctl::rules::ChannelList;

use crate::mock_hw::*;

const INPUTS: &str = "// switches\nDoor\nBed_Left\nBed_Right\n";
const OUTPUTS: &str = "Chandelier\nSconce_Left\nSconce_Right\n";
const RULES: &str = "\
door fall chandelier toggle
bed_left fall chandelier toggle
bed_right fall chandelier toggle
bed_left rise sconce_left turn_on
bed_left fall sconce_left turn_off
bed_right rise sconce_right turn_on
bed_right fall sconce_right turn_off
door rise - global_off
this line is broken
";

fn bedroom() -> (NamedController, Shared<MockInputs>, Shared<RecordingSender>) {
    let inputs = ChannelList::from_text(INPUTS).unwrap();
    let outputs = ChannelList::from_text(OUTPUTS).unwrap();
    let mut ctl = NamedController::new(ControllerConfig::default(), inputs, outputs);

    let raw = shared(MockInputs::new(3));
    let sender = shared(RecordingSender::default());
    ctl.controller_mut().set_input_device(raw.clone());
    ctl.controller_mut().set_output_device(shared(MockOutputs::default()));
    ctl.controller_mut().set_global_off_sender(sender.clone());
    assert_eq!(ctl.initialize_from_text(RULES), Ok(8));
    (ctl, raw, sender)
}

#[test]
fn channel_names_come_from_the_lists() {
    let (ctl, _, _) = bedroom();
    assert_eq!(ctl.input_count(), 3);
    assert_eq!(ctl.output_count(), 3);
    assert_eq!(ctl.input_name(1), Some("bed_left"));
    assert_eq!(ctl.output_name(0), Some("chandelier"));
    assert!(ctl.input_exists("DOOR"));
    assert!(!ctl.input_exists("window"));
    assert!(ctl.output_exists("Sconce_Right"));
    assert_eq!(ctl.controller().input_channel_count(), 3);
}

#[test]
fn unknown_names_read_unknown() {
    let (mut ctl, _, _) = bedroom();
    settle(ctl.controller_mut());
    assert_eq!(ctl.input_state("door"), DiscreteState::Off);
    assert_eq!(ctl.input_state("window"), DiscreteState::Unknown);
    assert_eq!(ctl.output_state("lamp"), DiscreteState::Unknown);
}

#[test]
fn bed_switch_drives_its_sconce() {
    let (mut ctl, raw, _) = bedroom();
    settle(ctl.controller_mut());
    switch_on(ctl.controller_mut(), &raw, 1);
    assert_eq!(ctl.input_state("bed_left"), DiscreteState::On);
    assert_eq!(ctl.output_state("sconce_left"), DiscreteState::On);
    assert_eq!(ctl.output_state("sconce_right"), DiscreteState::Off);
}

#[test]
fn named_override_and_offs() {
    let (mut ctl, raw, sender) = bedroom();
    settle(ctl.controller_mut());

    assert!(ctl.set_output_state("SCONCE_RIGHT", DiscreteState::On));
    ctl.execute(CYCLE_MS);
    assert_eq!(ctl.output_state("sconce_right"), DiscreteState::On);

    ctl.local_off();
    ctl.execute(CYCLE_MS);
    assert_eq!(ctl.output_state("sconce_right"), DiscreteState::Off);
    assert!(ctl.controller().is_local_off());

    // door rise → global_off; its output word is ignored.
    switch_on(ctl.controller_mut(), &raw, 0);
    assert_eq!(sender.borrow().global_offs, 1);

    ctl.global_off();
    ctl.execute(CYCLE_MS);
    assert_eq!(sender.borrow().global_offs, 2);
}

#[test]
fn facade_listeners() {
    let (mut ctl, raw, _) = bedroom();
    let log: NotificationLog = shared(Vec::new());
    let handle = ctl
        .register_listener(Box::new(TaggedListener { tag: "ui", log: log.clone() }))
        .unwrap();

    settle(ctl.controller_mut());
    switch_on(ctl.controller_mut(), &raw, 2);
    assert_eq!(*log.borrow(), [("ui", 2, EventType::Rise)]);

    assert!(ctl.unregister_listener(handle).is_some());
    switch_off(ctl.controller_mut());
    assert_eq!(log.borrow().len(), 1);
}
