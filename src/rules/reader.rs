//! [`RuleSource`] over in-memory rule text, one rule per line.

use log::warn;

use crate::app::ports::{RuleReadError, RuleSource};
use crate::model::Rule;

use super::parser::RuleParser;
use super::{LineKind, classify_line};

pub struct TextRuleReader<'a> {
    text: &'a str,
    pos: usize,
    parser: RuleParser<'a>,
}

impl<'a> TextRuleReader<'a> {
    pub fn new(text: &'a str, parser: RuleParser<'a>) -> Self {
        Self { text, pos: 0, parser }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let rest = self.text.get(self.pos..)?;
        if rest.is_empty() {
            return None;
        }
        let end = rest.find('\n').map_or(rest.len(), |i| i + 1);
        self.pos += end;
        Some(&rest[..end])
    }
}

impl RuleSource for TextRuleReader<'_> {
    fn reset(&mut self) -> bool {
        self.pos = 0;
        true
    }

    fn has_more_rules(&self) -> bool {
        self.pos < self.text.len()
    }

    fn read_rule(&mut self) -> Result<Rule, RuleReadError> {
        let line = self.next_line().ok_or(RuleReadError::NoData)?;
        match classify_line(line) {
            LineKind::Blank | LineKind::Comment => Err(RuleReadError::Skipped),
            LineKind::TooShort(bad) => {
                warn!("invalid rule line: {:?}", bad);
                Err(RuleReadError::Malformed)
            }
            LineKind::Content(text) => self.parser.parse(text).map_err(|faults| {
                warn!("invalid rule line: {:?} ({})", text, faults);
                RuleReadError::Malformed
            }),
        }
    }
}
