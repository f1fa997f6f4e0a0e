//! Application core: orchestration and the port boundary.
//!
//! The per-cycle pipeline lives in [`service`]; the filter, detector and
//! action manager it drives are plain concrete types in the crate root.
//! All interaction with hardware and the network happens through the
//! **port traits** in [`ports`], so this layer runs on the host with mocks.

pub mod commands;
pub mod facade;
pub mod ports;
pub mod service;
