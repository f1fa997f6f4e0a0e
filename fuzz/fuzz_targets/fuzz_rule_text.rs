//! Fuzz target: channel lists and rule text
//!
//! Splits the input into channel-list text and rule text, loads both into a
//! controller and runs a few cycles.  Loading must never panic and every
//! accepted rule must point at an existing channel.
//!
//! cargo fuzz run fuzz_rule_text

#![no_main]

use libfuzzer_sys::fuzz_target;
use lightctl::app::facade::NamedController;
use lightctl::config::ControllerConfig;
use lightctl::rules::ChannelList;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(3, '\0');
    let (Some(inputs), Some(outputs), Some(rules)) = (parts.next(), parts.next(), parts.next())
    else {
        return;
    };

    let (Ok(inputs), Ok(outputs)) = (ChannelList::from_text(inputs), ChannelList::from_text(outputs))
    else {
        return;
    };

    let mut ctl = NamedController::new(ControllerConfig::default(), inputs, outputs);
    let _ = ctl.initialize_from_text(rules);

    for rule in ctl.controller().rules() {
        assert!(rule.condition.input_channel < ctl.input_count());
        assert!(rule.action.output_channel < ctl.output_count().max(1));
    }
    for _ in 0..4 {
        ctl.execute(5);
    }
});
