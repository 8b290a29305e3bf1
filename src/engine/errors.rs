//! Native-side message store.
//!
//! Parse, DTD and syntax checks append here; each message optionally names
//! the [`RawNodeId`] it concerns. The bridge later moves them onto the
//! converted elements.

use super::raw_tree::RawNodeId;

/// Severity codes used by the native engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RawSeverity {
    Error = 1,
    Warning = 2,
    Info = 3,
}

impl RawSeverity {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Node the message is about; `None` for messages without context.
    pub context: Option<RawNodeId>,
    /// `file:line` location as reported by the engine.
    pub location: String,
    pub severity_code: i32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct RawErrorStore {
    messages: Vec<RawMessage>,
}

impl RawErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        context: Option<RawNodeId>,
        location: impl Into<String>,
        severity: RawSeverity,
        text: impl Into<String>,
    ) {
        self.add_with_code(context, location, severity.code(), text);
    }

    /// Add a message with a raw severity code, as foreign engines report them.
    pub fn add_with_code(
        &mut self,
        context: Option<RawNodeId>,
        location: impl Into<String>,
        severity_code: i32,
        text: impl Into<String>,
    ) {
        self.messages.push(RawMessage {
            context,
            location: location.into(),
            severity_code,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[RawMessage] {
        &self.messages
    }

    pub fn contains_error(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.severity_code == RawSeverity::Error.code())
    }

    /// Messages whose context is exactly `context`, in insertion order.
    pub fn messages_for(
        &self,
        context: Option<RawNodeId>,
    ) -> impl Iterator<Item = &RawMessage> + '_ {
        self.messages
            .iter()
            .filter(move |message| message.context == context)
    }
}
