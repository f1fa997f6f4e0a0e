//! Text rule layer.
//!
//! Turns the human-editable channel lists and rule lines into the numeric
//! [`Rule`](crate::model::Rule) records the core evaluates:
//!
//! ```text
//!   "in3 fall out1 toggle"
//!      │     │    │     └─ ActionNameResolver
//!      │     │    └─────── ChannelNameResolver (outputs)
//!      │     └──────────── EventNameResolver
//!      └────────────────── ChannelNameResolver (inputs)
//! ```

pub mod channels;
pub mod parser;
pub mod reader;
pub mod resolvers;

pub use channels::ChannelList;
pub use parser::{RuleFault, RuleFaults, RuleParser};
pub use reader::TextRuleReader;
pub use resolvers::StandardResolvers;

use crate::model::{ActionType, EventType};

/// Maps a channel name to its index.
pub trait ChannelNameResolver {
    fn resolve_channel(&self, name: &str) -> Option<usize>;
}

pub trait EventNameResolver {
    fn resolve_event(&self, name: &str) -> Option<EventType>;
}

pub trait ActionNameResolver {
    fn resolve_action(&self, name: &str) -> Option<ActionType>;
}

/// Trimmed text line classification shared by the list and rule readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    Comment,
    /// Non-empty but shorter than two characters.
    TooShort(&'a str),
    Content(&'a str),
}

pub(crate) fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        LineKind::Blank
    } else if line.chars().count() < 2 {
        LineKind::TooShort(line)
    } else if line.starts_with("//") {
        LineKind::Comment
    } else {
        LineKind::Content(line)
    }
}
