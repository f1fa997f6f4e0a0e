//! Fuzz target: `InputFilter::update`
//!
//! Each input byte is one sample: the low two bits pick the raw state, the
//! rest is the elapsed time.  The first four bytes configure the filter.
//!
//! cargo fuzz run fuzz_input_filter

#![no_main]

use libfuzzer_sys::fuzz_target;
use lightctl::filter::InputFilter;
use lightctl::model::DiscreteState;

fuzz_target!(|data: &[u8]| {
    let [p0, p1, hz, _, samples @ ..] = data else {
        return;
    };
    let period = u32::from(u16::from_le_bytes([*p0, *p1]));
    let mut filter = InputFilter::new(period, u32::from(*hz));

    for byte in samples {
        let raw = match byte & 0b11 {
            0 => DiscreteState::Unknown,
            1 => DiscreteState::On,
            _ => DiscreteState::Off,
        };
        filter.update(raw, u32::from(byte >> 2));
    }
    let _ = filter.resulting_state();
});
