//! Connection endpoint checks.

use std::sync::Arc;

use super::NedValidator;
use crate::semantic::diagnostics::DiagnosticSink;
use crate::semantic::error::InternalFault;
use crate::semantic::resolver::{LookupContext, TypeResolver};
use crate::semantic::type_info::{Member, TypeInfo};
use crate::syntax::{ArrowDirection, Element, GateType, Subgate, Tag, parse_bool};

/// Which end of a connection is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
}

struct EndpointAttributes {
    module: &'static str,
    module_index: &'static str,
    gate: &'static str,
    gate_plusplus: &'static str,
    gate_index: &'static str,
    gate_subg: &'static str,
}

const SOURCE_ATTRIBUTES: EndpointAttributes = EndpointAttributes {
    module: "src-module",
    module_index: "src-module-index",
    gate: "src-gate",
    gate_plusplus: "src-gate-plusplus",
    gate_index: "src-gate-index",
    gate_subg: "src-gate-subg",
};

const DESTINATION_ATTRIBUTES: EndpointAttributes = EndpointAttributes {
    module: "dest-module",
    module_index: "dest-module-index",
    gate: "dest-gate",
    gate_plusplus: "dest-gate-plusplus",
    gate_index: "dest-gate-index",
    gate_subg: "dest-gate-subg",
};

impl Endpoint {
    fn attributes(self) -> &'static EndpointAttributes {
        match self {
            Endpoint::Source => &SOURCE_ATTRIBUTES,
            Endpoint::Destination => &DESTINATION_ATTRIBUTES,
        }
    }

    /// Prefix of every message about this endpoint.
    pub fn prefix(self) -> &'static str {
        match self {
            Endpoint::Source => "wrong source gate: ",
            Endpoint::Destination => "wrong destination gate: ",
        }
    }
}

/// One endpoint of a connection, read off the connection's attributes.
struct EndpointRef<'c> {
    end: Endpoint,
    module: &'c str,
    module_index: &'c str,
    gate: &'c str,
    plusplus: bool,
    gate_index: &'c str,
    subgate: Subgate,
}

impl<'c> EndpointRef<'c> {
    fn read(connection: &'c Element, end: Endpoint) -> Self {
        let names = end.attributes();
        Self {
            end,
            module: connection.attribute(names.module),
            module_index: connection.attribute(names.module_index),
            gate: connection.attribute(names.gate),
            plusplus: parse_bool(connection.attribute(names.gate_plusplus)).unwrap_or(false),
            gate_index: connection.attribute(names.gate_index),
            subgate: Subgate::parse(connection.attribute(names.gate_subg)).unwrap_or_default(),
        }
    }

    fn connects_to_parent(&self) -> bool {
        self.module.is_empty()
    }

    fn used_as_vector(&self) -> bool {
        self.plusplus || !self.gate_index.is_empty()
    }

    /// Gate name as written, with the `$i`/`$o` suffix.
    fn full_gate_name(&self) -> String {
        format!("{}{}", self.gate, self.subgate.suffix())
    }
}

fn direction_name(direction: GateType) -> &'static str {
    match direction {
        GateType::Input => "input",
        GateType::Output => "output",
        GateType::Inout | GateType::None => "inout",
    }
}

impl<R, S> NedValidator<'_, R, S>
where
    R: TypeResolver + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    pub(super) fn validate_connection(
        &mut self,
        connection: &Arc<Element>,
    ) -> Result<(), InternalFault> {
        let (current, _, _) = self.current_type(Tag::Connection)?;
        if current.tag() != Tag::CompoundModule {
            return Err(InternalFault::ConnectionOutsideCompound);
        }

        self.validate_endpoint(connection, Endpoint::Source);
        self.validate_endpoint(connection, Endpoint::Destination);

        self.validate_children(connection)
    }

    fn validate_endpoint(&mut self, connection: &Element, end: Endpoint) {
        let endpoint = EndpointRef::read(connection, end);
        let prefix = end.prefix();

        if endpoint.connects_to_parent() {
            let declaration = self
                .scope
                .members
                .get(endpoint.gate)
                .filter(|member| member.is_gate_declaration())
                .map(|member| Arc::clone(&member.element));
            match declaration {
                Some(declaration) => self.check_gate(connection, &endpoint, &declaration),
                None => self.error(
                    connection,
                    format!(
                        "{}compound module has no gate named '{}'",
                        prefix, endpoint.gate
                    ),
                ),
            }
            return;
        }

        let Some(submodule) = self
            .scope
            .members
            .get(endpoint.module)
            .filter(|member| member.is_submodule())
            .cloned()
        else {
            self.error(
                connection,
                format!("{}no such submodule: '{}'", prefix, endpoint.module),
            );
            return;
        };

        let is_vector_submodule = !submodule.element.attribute("vector-size").is_empty();
        let has_index = !endpoint.module_index.is_empty();
        if has_index && !is_vector_submodule {
            self.error(
                connection,
                format!(
                    "{}extra submodule index ('{}' is not a vector submodule)",
                    prefix, endpoint.module
                ),
            );
        } else if !has_index && is_vector_submodule {
            self.error(
                connection,
                format!(
                    "{}missing submodule index ('{}' is a vector submodule)",
                    prefix, endpoint.module
                ),
            );
        }

        // an unresolved submodule type has an empty gate table
        let declaration = self
            .submodule_type(&submodule)
            .and_then(|info| info.gate_declaration(endpoint.gate).cloned());
        match declaration {
            Some(declaration) => self.check_gate(connection, &endpoint, &declaration),
            None => self.error(
                connection,
                format!(
                    "{}submodule '{}' has no gate named '{}'",
                    prefix, endpoint.module, endpoint.gate
                ),
            ),
        }
    }

    /// Type of a submodule member, if it resolves to the kind its declaration asks for.
    fn submodule_type(&self, submodule: &Member) -> Option<Arc<TypeInfo>> {
        let context = LookupContext::Type(submodule.owner.clone());
        let type_name = submodule.element.attribute("type");
        if !type_name.is_empty() {
            return self
                .resolver
                .lookup_type(type_name, &context)
                .filter(|info| info.tag().is_module_type());
        }
        let like_type = submodule.element.attribute("like-type");
        if !like_type.is_empty() {
            return self
                .resolver
                .lookup_type(like_type, &context)
                .filter(|info| info.tag() == Tag::ModuleInterface);
        }
        None
    }

    /// Vector usage, subgate notation and direction of one endpoint.
    fn check_gate(&mut self, connection: &Element, endpoint: &EndpointRef<'_>, declaration: &Element) {
        let prefix = endpoint.end.prefix();
        let gate = endpoint.gate;

        if endpoint.used_as_vector() && !declaration.is_vector() {
            self.error(
                connection,
                format!(
                    "{}extra gate index or '++' ('{}' is not a vector gate)",
                    prefix, gate
                ),
            );
        } else if !endpoint.used_as_vector() && declaration.is_vector() {
            self.error(
                connection,
                format!("{}missing gate index ('{}' is a vector gate)", prefix, gate),
            );
        }

        let declared = declaration.gate_type();
        if declared != GateType::Inout && endpoint.subgate != Subgate::None {
            self.error(
                connection,
                format!(
                    "{}$i/$o syntax only allowed for inout gates ('{}' is an {} gate)",
                    prefix,
                    gate,
                    direction_name(declared)
                ),
            );
            return;
        }

        let actual = match endpoint.subgate {
            Subgate::Input => GateType::Input,
            Subgate::Output => GateType::Output,
            Subgate::None => declared,
        };

        let arrow = ArrowDirection::parse(connection.attribute("arrow-direction")).unwrap_or_default();
        let expected = if arrow == ArrowDirection::Bidirectional {
            GateType::Inout
        } else if (endpoint.end == Endpoint::Source) == endpoint.connects_to_parent() {
            GateType::Input
        } else {
            GateType::Output
        };

        if direction_name(actual) != direction_name(expected) {
            self.error(
                connection,
                format!(
                    "{}{} gate expected but '{}' is an {} gate",
                    prefix,
                    direction_name(expected),
                    endpoint.full_gate_name(),
                    direction_name(actual)
                ),
            );
        }
    }
}
