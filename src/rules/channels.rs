//! Ordered channel-name table.
//!
//! One name per line; a channel's index is its position among the accepted
//! lines.  Names are stored lowercase and matched case-insensitively.

use heapless::Vec;
use log::warn;

use crate::error::{ControlError, Result};
use crate::model::{MAX_INPUT_CHANNELS, MAX_OUTPUT_CHANNELS};

use super::{ChannelNameResolver, LineKind, classify_line};

/// Capacity of one list; the larger of the two channel caps.
pub const CHANNEL_LIST_CAPACITY: usize = if MAX_INPUT_CHANNELS > MAX_OUTPUT_CHANNELS {
    MAX_INPUT_CHANNELS
} else {
    MAX_OUTPUT_CHANNELS
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelList {
    names: Vec<String, CHANNEL_LIST_CAPACITY>,
}

impl ChannelList {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Build a list from channel-list text.  Blank lines and `//` comments
    /// are ignored; one-character lines are logged and skipped.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut list = Self::new();
        for line in text.lines() {
            match classify_line(line) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::TooShort(bad) => warn!("invalid channel line: {:?}", bad),
                LineKind::Content(name) => {
                    list.push(name)?;
                }
            }
        }
        Ok(list)
    }

    /// Append a channel, returning its index.
    pub fn push(&mut self, name: &str) -> Result<usize> {
        let index = self.names.len();
        self.names
            .push(name.trim().to_ascii_lowercase())
            .map_err(|_| ControlError::TooManyChannels)?;
        Ok(index)
    }

    /// Index of the first channel called `name`.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ChannelNameResolver for ChannelList {
    fn resolve_channel(&self, name: &str) -> Option<usize> {
        self.resolve(name)
    }
}
