//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                    | Connects to            |
//! |------------|-------------------------------|------------------------|
//! | `expander` | InputPort, OutputPort         | PCF8574 banks over I2C |
//! | `log_sink` | EventSender, GlobalOffSender  | Serial log output      |
//! | `time`     | -                             | System timer           |

pub mod expander;
pub mod log_sink;
pub mod time;
