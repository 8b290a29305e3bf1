//! Per-run scope state of the validator.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::resolver::LookupContext;
use super::type_info::{Member, TypeInfo};
use crate::syntax::Element;

/// One level of "what declaration am I inside".
#[derive(Debug, Clone)]
pub enum Frame {
    Type {
        element: Arc<Element>,
        qualified_name: SmolStr,
        /// Context the type's own header (extends, like) resolves in.
        lookup_context: LookupContext,
    },
    Submodule {
        element: Arc<Element>,
        /// `None` when the submodule's type could not be resolved.
        resolved: Option<Arc<TypeInfo>>,
    },
    ChannelSpec {
        element: Arc<Element>,
        resolved: Option<Arc<TypeInfo>>,
    },
}

#[derive(Debug, Default)]
pub struct ScopeState {
    /// Members of the type being validated, inherited ones included.
    pub members: IndexMap<SmolStr, Member>,
    /// Contents of the type's `types:` section.
    pub inner_types: IndexMap<SmolStr, Arc<TypeInfo>>,
    frames: Vec<Frame>,
}

impl ScopeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost type frame: `(element, qualified name, header context)`.
    pub fn current_type(&self) -> Option<(&Arc<Element>, &SmolStr, &LookupContext)> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Type {
                element,
                qualified_name,
                lookup_context,
            } => Some((element, qualified_name, lookup_context)),
            _ => None,
        })
    }

    /// The submodule being validated, if the innermost frame is one.
    pub fn current_submodule(&self) -> Option<(&Arc<Element>, Option<&Arc<TypeInfo>>)> {
        match self.frames.last() {
            Some(Frame::Submodule { element, resolved }) => Some((element, resolved.as_ref())),
            _ => None,
        }
    }

    /// The channel spec being validated, if the innermost frame is one.
    pub fn current_channel_spec(&self) -> Option<(&Arc<Element>, Option<&Arc<TypeInfo>>)> {
        match self.frames.last() {
            Some(Frame::ChannelSpec { element, resolved }) => Some((element, resolved.as_ref())),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.inner_types.clear();
    }

    /// No members, no inner types, no open frames.
    pub fn is_clear(&self) -> bool {
        self.members.is_empty() && self.inner_types.is_empty() && self.frames.is_empty()
    }
}
