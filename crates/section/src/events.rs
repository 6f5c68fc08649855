//! Named-event subscription for compile results.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{CompileError, CompileWarning};
use crate::scene::SceneGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Compiled,
    Error,
    Warning,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Compiled => "compiled",
            EventKind::Error => "error",
            EventKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown event '{0}' (expected compiled, error or warning)")]
pub struct UnknownEvent(pub String);

impl FromStr for EventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compiled" => Ok(EventKind::Compiled),
            "error" => Ok(EventKind::Error),
            "warning" => Ok(EventKind::Warning),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Payload handed to subscribers
#[derive(Debug)]
pub enum CompileEvent<'a> {
    Compiled(&'a SceneGroup),
    Error(&'a CompileError),
    Warning(&'a CompileWarning),
}

impl CompileEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            CompileEvent::Compiled(_) => EventKind::Compiled,
            CompileEvent::Error(_) => EventKind::Error,
            CompileEvent::Warning(_) => EventKind::Warning,
        }
    }
}

type Handler = Box<dyn Fn(&CompileEvent<'_>) + Send + Sync>;

/// Handlers keyed by event kind, called in subscription order
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe by event name
    pub fn on<F>(&mut self, event: &str, handler: F) -> Result<(), UnknownEvent>
    where
        F: Fn(&CompileEvent<'_>) + Send + Sync + 'static,
    {
        let kind = event.parse()?;
        self.subscribe(kind, handler);
        Ok(())
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&CompileEvent<'_>) + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    pub fn emit(&self, event: &CompileEvent<'_>) {
        if let Some(handlers) = self.handlers.get(&event.kind()) {
            for handler in handlers {
                handler(event);
            }
        }
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}
