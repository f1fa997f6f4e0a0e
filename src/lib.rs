//! Light controller firmware library.
//!
//! Exposes the control core and adapters for host testing.  Everything
//! ESP-IDF-specific is behind the `espidf` feature.
//!
//! ```text
//!  raw sample ─▶ InputFilter ─▶ EventDetector ─▶ ActionManager ─▶ outputs
//!                     (one per input)        rules + overrides
//! ```

#![deny(unused_must_use)]

pub mod actions;
pub mod adapters;
pub mod app;
pub mod config;
pub mod defaults;
pub mod detector;
pub mod drivers;
pub mod error;
pub mod filter;
pub mod model;
pub mod pins;
pub mod rules;

pub use error::{ControlError, Result};
