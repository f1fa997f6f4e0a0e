//! Built-in event and action keywords.

use crate::model::{ActionType, EventType};

use super::{ActionNameResolver, EventNameResolver};

const EVENTS: [EventType; 2] = [EventType::Rise, EventType::Fall];

const ACTIONS: [ActionType; 5] = [
    ActionType::TurnOn,
    ActionType::TurnOff,
    ActionType::Toggle,
    ActionType::LocalOff,
    ActionType::GlobalOff,
];

/// Resolves `rise`/`fall` and `turn_on`/`turn_off`/`toggle`/`local_off`/
/// `global_off`, ignoring case and surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolvers;

impl EventNameResolver for StandardResolvers {
    fn resolve_event(&self, name: &str) -> Option<EventType> {
        let name = name.trim();
        EVENTS.into_iter().find(|e| e.name().eq_ignore_ascii_case(name))
    }
}

impl ActionNameResolver for StandardResolvers {
    fn resolve_action(&self, name: &str) -> Option<ActionType> {
        let name = name.trim();
        ACTIONS.into_iter().find(|a| a.name().eq_ignore_ascii_case(name))
    }
}
