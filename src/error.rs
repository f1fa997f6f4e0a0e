//! Unified error type for the controller core.
//!
//! Every fallible operation returns a [`ControlError`] instead of panicking.
//! All variants are `Copy` so they can be passed up through the orchestrator
//! and the facade without allocation.
//!
//! | Category   | Variants                                              |
//! |------------|-------------------------------------------------------|
//! | Capacity   | `TooManyChannels`, `TooManyRules`, `TooManyListeners` |
//! | Index      | `InvalidChannelIndex`                                 |
//! | Init       | `NoRulesLoaded`                                       |
//! | Staging    | `QueueFull`                                           |
//! | Config     | `Config`                                              |
//!
//! Capacity errors are detected before any state is touched, so a rejected
//! call leaves the callee exactly as it was.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// A channel index is at or beyond the configured channel count.
    InvalidChannelIndex,
    /// A requested channel count exceeds the 128-channel design cap.
    TooManyChannels,
    /// The rule table already holds the maximum number of rules.
    TooManyRules,
    /// No free slot left in the listener table.
    TooManyListeners,
    /// Initialization finished without a single rule in the table.
    NoRulesLoaded,
    /// The external command queue is full; the command was dropped.
    QueueFull,
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannelIndex => write!(f, "invalid channel index"),
            Self::TooManyChannels => write!(f, "too many channels"),
            Self::TooManyRules => write!(f, "too many rules"),
            Self::TooManyListeners => write!(f, "too many listeners"),
            Self::NoRulesLoaded => write!(f, "no rules loaded"),
            Self::QueueFull => write!(f, "command queue full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for ControlError {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, ControlError>;
