//! Resolved metadata for a NED type.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::resolver::LookupContext;
use crate::syntax::{Element, GateType, ParamType, Tag};

/// A named member of a type: parameter, gate, submodule or inner type.
#[derive(Debug, Clone)]
pub struct Member {
    /// The declaring element.
    pub element: Arc<Element>,
    /// Qualified name of the type that declares it (a base type for
    /// inherited members).
    pub owner: SmolStr,
}

impl Member {
    pub fn new(element: Arc<Element>, owner: impl Into<SmolStr>) -> Self {
        Self {
            element,
            owner: owner.into(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.element.tag()
    }

    /// A `param` element that declares a type (as opposed to an assignment).
    pub fn is_param_declaration(&self) -> bool {
        self.element.tag() == Tag::Param && self.element.param_type() != ParamType::None
    }

    /// A `gate` element that declares a direction.
    pub fn is_gate_declaration(&self) -> bool {
        self.element.tag() == Tag::Gate && self.element.gate_type() != GateType::None
    }

    pub fn is_submodule(&self) -> bool {
        self.element.tag() == Tag::Submodule
    }
}

/// Type metadata, as handed out by a [`TypeResolver`](super::TypeResolver).
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: SmolStr,
    pub qualified_name: SmolStr,
    /// The type declaration element.
    pub element: Arc<Element>,
    /// Context in which names used by this type's declaration are resolved.
    pub lookup_context: LookupContext,
    /// All members, inherited ones first, in declaration order.
    pub members: IndexMap<SmolStr, Member>,
}

impl TypeInfo {
    pub fn tag(&self) -> Tag {
        self.element.tag()
    }

    /// Context for names used inside this type's body.
    pub fn inner_context(&self) -> LookupContext {
        LookupContext::Type(self.qualified_name.clone())
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn param_declarations(&self) -> impl Iterator<Item = (&SmolStr, &Member)> + '_ {
        self.members
            .iter()
            .filter(|(_, member)| member.is_param_declaration())
    }

    pub fn gate_declarations(&self) -> impl Iterator<Item = (&SmolStr, &Member)> + '_ {
        self.members
            .iter()
            .filter(|(_, member)| member.is_gate_declaration())
    }

    pub fn submodules(&self) -> impl Iterator<Item = (&SmolStr, &Member)> + '_ {
        self.members.iter().filter(|(_, member)| member.is_submodule())
    }

    /// Declaring element of the named parameter.
    pub fn param_declaration(&self, name: &str) -> Option<&Arc<Element>> {
        self.member(name)
            .filter(|member| member.is_param_declaration())
            .map(|member| &member.element)
    }

    /// Declaring element of the named gate.
    pub fn gate_declaration(&self, name: &str) -> Option<&Arc<Element>> {
        self.member(name)
            .filter(|member| member.is_gate_declaration())
            .map(|member| &member.element)
    }
}
