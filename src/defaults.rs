//! Built-in channel lists and rule table.
//!
//! Used by the firmware when no stored configuration exists: sixteen wall
//! switches `in1..in16`, eight relay outputs `out1..out8`, every switch
//! following its lamp except `in3`, which toggles `out1`.

/// Input channel list.
pub const INPUTS_TEXT: &str = "\
// Input channels, one name per line, no whitespace inside a name.
// Lines starting with // are ignored.

in1
in2
in3
in4
in5
in6
in7
in8
in9
in10
in11
in12
in13
in14
in15
in16
";

/// Output channel list.
pub const OUTPUTS_TEXT: &str = "\
// Output channels, one name per line, no whitespace inside a name.
// Lines starting with // are ignored.

out1
out2
out3
out4
out5
out6
out7
out8
";

/// Rule table.
pub const RULES_TEXT: &str = "\
// INPUT_CHANNEL EVENT OUTPUT_CHANNEL ACTION
//
// events:  rise, fall
// actions: turn_on, turn_off, toggle, local_off, global_off
//
// local_off and global_off ignore OUTPUT_CHANNEL, but it must be present.

in1 fall out1 turn_off
in1 rise out1 turn_on

in2 fall out2 turn_off
in2 rise out2 turn_on

//in3 fall out1 turn_off
//in3 rise out1 turn_on
in3 fall out1 toggle

in4 fall out4 turn_off
in4 rise out4 turn_on

in5 fall out5 turn_off
in5 rise out5 turn_on

in6 fall out6 turn_off
in6 rise out6 turn_on

in7 fall out7 turn_off
in7 rise out7 turn_on

in8 fall out8 turn_off
in8 rise out8 turn_on

in9 fall out1 turn_off
in9 rise out1 turn_on

in10 fall out2 turn_off
in10 rise out2 turn_on

in11 fall out3 turn_off
in11 rise out3 turn_on

in12 fall out4 turn_off
in12 rise out4 turn_on

in13 fall out5 turn_off
in13 rise out5 turn_on

in14 fall out6 turn_off
in14 rise out6 turn_on

in15 fall out7 turn_off
in15 rise out7 turn_on

in16 fall out8 turn_off
in16 rise out8 turn_on
";
