//! Semantic validation of NED element trees.
//!
//! [`NedValidator`] walks a tree top-down and reports every problem it finds
//! to a [`DiagnosticSink`]. Dispatch is an exhaustive match over [`Tag`];
//! kinds without checks of their own just recurse into their children.
//!
//! Scope bookkeeping lives in [`ScopeState`]: the members of the type being
//! validated and a frame stack recording whether we are inside a type, a
//! submodule or a channel spec. Nested types are validated by a fresh
//! validator so nothing leaks into the enclosing type's scope.

mod connections;

use std::sync::Arc;

use smol_str::SmolStr;

use super::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticSink};
use super::error::InternalFault;
use super::hooks::{NoHooks, SemanticHooks};
use super::imports::{import_to_regex, is_wildcard_import};
use super::options::ValidatorConfig;
use super::resolver::{LookupContext, TypeResolver};
use super::scope::{Frame, ScopeState};
use super::type_info::{Member, TypeInfo};
use crate::syntax::{Element, GateType, ParamType, Tag};

pub use connections::Endpoint;

pub struct NedValidator<'a, R, S>
where
    R: TypeResolver + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    resolver: &'a R,
    project: &'a str,
    sink: &'a mut S,
    config: ValidatorConfig,
    hooks: &'a dyn SemanticHooks,
    /// Context the type declarations met at this level resolve their headers in.
    context: LookupContext,
    package: SmolStr,
    imports: Vec<SmolStr>,
    scope: ScopeState,
}

impl<'a, R, S> NedValidator<'a, R, S>
where
    R: TypeResolver + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    pub fn new(resolver: &'a R, project: &'a str, sink: &'a mut S) -> Self {
        Self {
            resolver,
            project,
            sink,
            config: ValidatorConfig::default(),
            hooks: &NoHooks,
            context: LookupContext::File(SmolStr::default()),
            package: SmolStr::default(),
            imports: Vec::new(),
            scope: ScopeState::new(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hooks(mut self, hooks: &'a dyn SemanticHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Validate type declarations as if they appeared in `context` under
    /// `package`. Only needed when the root is not a file element.
    pub fn with_context(mut self, context: LookupContext, package: &str) -> Self {
        self.context = context;
        self.package = SmolStr::new(package);
        self
    }

    pub fn scope(&self) -> &ScopeState {
        &self.scope
    }

    /// True when no scope state is left behind.
    pub fn is_scope_clear(&self) -> bool {
        self.scope.is_clear()
    }

    /// Validate `element` and its subtree.
    ///
    /// Problems in the tree are reported to the sink; `Err` is returned only
    /// for internal consistency faults.
    pub fn validate(&mut self, element: &Arc<Element>) -> Result<(), InternalFault> {
        tracing::trace!(tag = %element.tag(), line = element.line(), "validate");
        match element.tag() {
            Tag::NedFile => self.validate_ned_file(element),
            Tag::Import => self.validate_import(element),
            Tag::Extends => self.validate_extends(element),
            Tag::InterfaceName => self.validate_interface_name(element),
            Tag::SimpleModule
            | Tag::ModuleInterface
            | Tag::CompoundModule
            | Tag::ChannelInterface
            | Tag::Channel => self.validate_type(element),
            Tag::Param => self.validate_param(element),
            Tag::Gate => self.validate_gate(element),
            Tag::Types => self.validate_types(element),
            Tag::Submodule => self.validate_submodule(element),
            Tag::Connection => self.validate_connection(element),
            Tag::ChannelSpec => self.validate_channel_spec(element),
            Tag::PacketDecl | Tag::Packet => Ok(()),
            Tag::Files
            | Tag::Comment
            | Tag::Package
            | Tag::PropertyDecl
            | Tag::Parameters
            | Tag::Pattern
            | Tag::Property
            | Tag::PropertyKey
            | Tag::Gates
            | Tag::Submodules
            | Tag::Connections
            | Tag::ConnectionGroup
            | Tag::Loop
            | Tag::Condition
            | Tag::Expression
            | Tag::Operator
            | Tag::Function
            | Tag::Ident
            | Tag::Literal
            | Tag::MsgFile
            | Tag::Namespace
            | Tag::Cplusplus
            | Tag::StructDecl
            | Tag::ClassDecl
            | Tag::MessageDecl
            | Tag::EnumDecl
            | Tag::Enum
            | Tag::EnumFields
            | Tag::EnumField
            | Tag::Message
            | Tag::Class
            | Tag::Struct
            | Tag::Fields
            | Tag::Field
            | Tag::Unknown => self.validate_children(element),
        }
    }

    fn validate_children(&mut self, element: &Arc<Element>) -> Result<(), InternalFault> {
        for child in element.children() {
            self.validate(child)?;
        }
        Ok(())
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn error(&mut self, element: &Element, message: String) {
        self.sink.add_error(element, message);
    }

    fn warning(&mut self, element: &Element, message: String) {
        self.sink.add_warning(element, message);
    }

    fn lookup(&self, name: &str, context: &LookupContext) -> Option<Arc<TypeInfo>> {
        self.resolver.lookup_type(name, context)
    }

    /// Qualified name a type declared at this level gets.
    fn qualify(&self, name: &str) -> SmolStr {
        match &self.context {
            LookupContext::Type(outer) => SmolStr::new(format!("{outer}.{name}")),
            LookupContext::File(_) if self.package.is_empty() => SmolStr::new(name),
            LookupContext::File(_) => SmolStr::new(format!("{}.{}", self.package, name)),
        }
    }

    /// The innermost type frame, cloned: `(element, qualified name, header context)`.
    fn current_type(&self, tag: Tag) -> Result<(Arc<Element>, SmolStr, LookupContext), InternalFault> {
        self.scope
            .current_type()
            .map(|(element, qualified_name, context)| {
                (Arc::clone(element), qualified_name.clone(), context.clone())
            })
            .ok_or(InternalFault::outside_type(tag))
    }

    /// Validator for a nested type, sharing resolver, sink and settings.
    fn nested(&mut self, context: LookupContext) -> NedValidator<'_, R, S> {
        NedValidator {
            resolver: self.resolver,
            project: self.project,
            sink: &mut *self.sink,
            config: self.config.clone(),
            hooks: self.hooks,
            context,
            package: self.package.clone(),
            imports: self.imports.clone(),
            scope: ScopeState::new(),
        }
    }

    // ========================================================================
    // FILE LEVEL
    // ========================================================================

    fn validate_ned_file(&mut self, file: &Arc<Element>) -> Result<(), InternalFault> {
        let file_name = file.attribute("filename");
        self.context = LookupContext::File(SmolStr::new(file_name));
        self.package = SmolStr::new(file.package_name());
        self.imports = file
            .children_with_tag(Tag::Import)
            .map(|import| SmolStr::new(import.attribute("import-spec")))
            .collect();

        if let Some(expected) = self.resolver.expected_package_for(file_name) {
            let declared = file.package_name();
            if expected != declared {
                let target = file.first_child(Tag::Package).unwrap_or(file);
                self.error(
                    target,
                    format!(
                        "declared package \"{}\" does not match expected package \"{}\"",
                        declared, expected
                    ),
                );
            }
        }

        self.validate_children(file)
    }

    fn validate_import(&mut self, import: &Arc<Element>) -> Result<(), InternalFault> {
        let spec = import.attribute("import-spec");
        if !is_wildcard_import(spec) {
            if self
                .resolver
                .lookup_toplevel_type(spec, self.project)
                .is_none()
            {
                self.error(import, format!("imported NED type not found: '{}'", spec));
            }
        } else {
            let found = match import_to_regex(spec) {
                Ok(pattern) => self
                    .resolver
                    .type_qualified_names(self.project)
                    .iter()
                    .any(|name| pattern.is_match(name)),
                Err(err) => {
                    tracing::debug!("unusable import pattern '{}': {}", spec, err);
                    false
                }
            };
            if !found {
                self.warning(import, format!("import does not match any NED type: '{}'", spec));
            }
        }

        let all_imports: Vec<&str> = self.imports.iter().map(SmolStr::as_str).collect();
        if let Some(message) = self.hooks.check_import_clash(import, &all_imports) {
            self.error(import, message);
        }

        self.validate_children(import)
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    fn validate_type(&mut self, declaration: &Arc<Element>) -> Result<(), InternalFault> {
        if self.scope.current_type().is_some() {
            return Err(InternalFault::NestedTypeScope {
                name: declaration.name().to_string(),
            });
        }

        let qualified_name = self.qualify(declaration.name());
        tracing::debug!("validating {} {}", declaration.tag().readable_name(), qualified_name);

        self.scope.clear();
        self.scope.push(Frame::Type {
            element: Arc::clone(declaration),
            qualified_name,
            lookup_context: self.context.clone(),
        });
        let result = self.validate_children(declaration);
        self.scope.pop();
        self.scope.clear();
        result
    }

    fn validate_extends(&mut self, extends: &Arc<Element>) -> Result<(), InternalFault> {
        let (current, _, header_context) = self.current_type(Tag::Extends)?;

        let name = extends.name();
        let Some(base) = self.lookup(name, &header_context) else {
            self.error(extends, format!("no such component: '{}'", name));
            return Ok(());
        };
        if base.tag() != current.tag() {
            self.error(
                extends,
                format!("'{}' is not a {}", name, current.tag().readable_name()),
            );
            return Ok(());
        }

        if let Some(message) = self.hooks.check_inheritance_chain(&current, &base) {
            self.error(extends, message);
        }

        for (member_name, member) in &base.members {
            if self.scope.members.contains_key(member_name) {
                self.error(
                    extends,
                    format!(
                        "'{}': conflicts with inherited member of '{}'",
                        member_name, name
                    ),
                );
            } else {
                self.scope
                    .members
                    .insert(member_name.clone(), member.clone());
            }
        }

        self.validate_children(extends)
    }

    fn validate_interface_name(&mut self, interface: &Arc<Element>) -> Result<(), InternalFault> {
        let (current, _, header_context) = self.current_type(Tag::InterfaceName)?;

        let name = interface.name();
        let Some(resolved) = self.lookup(name, &header_context) else {
            self.error(interface, format!("no such interface: '{}'", name));
            return Ok(());
        };

        if current.tag().is_module_like() {
            if resolved.tag() != Tag::ModuleInterface {
                self.error(interface, format!("'{}' is not a module interface", name));
                return Ok(());
            }
        } else if resolved.tag() != Tag::ChannelInterface {
            self.error(interface, format!("'{}' is not a channel interface", name));
            return Ok(());
        }

        if let Some(message) = self.hooks.check_interface_compliance(&current, &resolved) {
            self.error(interface, message);
        }

        self.validate_children(interface)
    }

    fn validate_types(&mut self, types: &Arc<Element>) -> Result<(), InternalFault> {
        let (_, qualified_name, _) = self.current_type(Tag::Types)?;
        let body_context = LookupContext::Type(qualified_name.clone());

        for child in types.children() {
            if !child.tag().is_type_declaration() {
                continue;
            }
            self.nested(body_context.clone()).validate(child)?;

            let name = SmolStr::new(child.name());
            if let Some(info) = self.lookup(&name, &body_context) {
                self.scope.inner_types.insert(name.clone(), info);
            }
            self.scope
                .members
                .insert(name, Member::new(Arc::clone(child), qualified_name.clone()));
        }
        Ok(())
    }

    // ========================================================================
    // PARAMETERS AND GATES
    // ========================================================================

    /// Register a declaration as a member, reporting a clash with an earlier one.
    fn declare(&mut self, element: &Arc<Element>, owner: SmolStr) -> bool {
        let name = element.name();
        if let Some(existing) = self.scope.members.get(name) {
            let message = format!(
                "'{}': already defined at {}",
                name,
                existing.element.describe_location()
            );
            self.error(element, message);
            return false;
        }
        self.scope
            .members
            .insert(SmolStr::new(name), Member::new(Arc::clone(element), owner));
        true
    }

    fn validate_param(&mut self, param: &Arc<Element>) -> Result<(), InternalFault> {
        let name = param.name();
        let submodule = self.scope.current_submodule().map(|(_, t)| t.cloned());
        let channel_spec = self.scope.current_channel_spec().map(|(_, t)| t.cloned());

        if param.param_type() != ParamType::None {
            if submodule.is_some() {
                self.error(
                    param,
                    format!(
                        "'{}': new parameters can only be defined on a module type, but not per submodule",
                        name
                    ),
                );
                return Ok(());
            }
            if channel_spec.is_some() {
                self.error(
                    param,
                    format!(
                        "'{}': new channel parameters can only be defined on a channel type, but not per connection",
                        name
                    ),
                );
                return Ok(());
            }
            let (_, owner, _) = self.current_type(Tag::Param)?;
            if !self.declare(param, owner) {
                return Ok(());
            }
        }

        // every param is also an assignment of a declared parameter
        if let Some(resolved) = submodule {
            let Some(resolved) = resolved else {
                self.error(
                    param,
                    "cannot assign parameters of a submodule of unknown type".to_string(),
                );
                return Ok(());
            };
            if resolved.param_declaration(name).is_none() {
                self.error(
                    param,
                    format!("'{}': type '{}' has no such parameter", name, resolved.name),
                );
                return Ok(());
            }
        } else if let Some(resolved) = channel_spec {
            let Some(resolved) = resolved else {
                self.error(
                    param,
                    "cannot assign parameters of a channel of unknown type".to_string(),
                );
                return Ok(());
            };
            if resolved.param_declaration(name).is_none() {
                self.error(
                    param,
                    format!("'{}': type '{}' has no such parameter", name, resolved.name),
                );
                return Ok(());
            }
        } else {
            let declared = self
                .scope
                .members
                .get(name)
                .is_some_and(Member::is_param_declaration);
            if !declared {
                self.error(param, format!("'{}': undefined parameter", name));
                return Ok(());
            }
        }

        self.validate_children(param)
    }

    fn validate_gate(&mut self, gate: &Arc<Element>) -> Result<(), InternalFault> {
        let name = gate.name();
        let submodule = self.scope.current_submodule().map(|(_, t)| t.cloned());

        if gate.gate_type() != GateType::None {
            if submodule.is_some() {
                self.error(
                    gate,
                    format!(
                        "'{}': new gates can only be defined on a module type, but not per submodule",
                        name
                    ),
                );
                return Ok(());
            }
            let (_, owner, _) = self.current_type(Tag::Gate)?;
            if !self.declare(gate, owner) {
                return Ok(());
            }
        }

        let declaration = match submodule {
            Some(None) => {
                self.error(
                    gate,
                    "cannot configure gates of a submodule of unknown type".to_string(),
                );
                return Ok(());
            }
            Some(Some(resolved)) => match resolved.gate_declaration(name) {
                Some(declaration) => Arc::clone(declaration),
                None => {
                    self.error(
                        gate,
                        format!("'{}': type '{}' has no such gate", name, resolved.name),
                    );
                    return Ok(());
                }
            },
            None => match self
                .scope
                .members
                .get(name)
                .filter(|member| member.is_gate_declaration())
            {
                Some(member) => Arc::clone(&member.element),
                None => {
                    self.error(gate, format!("'{}': undefined gate", name));
                    return Ok(());
                }
            },
        };

        if declaration.is_vector() && !gate.is_vector() {
            self.error(
                gate,
                format!(
                    "missing []: '{}' was declared as a vector gate at {}",
                    name,
                    declaration.describe_location()
                ),
            );
            return Ok(());
        }
        if !declaration.is_vector() && gate.is_vector() {
            self.error(
                gate,
                format!(
                    "'{}' was declared as a non-vector gate at {}",
                    name,
                    declaration.describe_location()
                ),
            );
            return Ok(());
        }

        self.validate_children(gate)
    }

    // ========================================================================
    // SUBMODULES AND CHANNEL SPECS
    // ========================================================================

    fn validate_submodule(&mut self, submodule: &Arc<Element>) -> Result<(), InternalFault> {
        let (_, owner, _) = self.current_type(Tag::Submodule)?;
        let body_context = LookupContext::Type(owner.clone());

        self.declare(submodule, owner);

        let type_name = submodule.attribute("type");
        let like_type = submodule.attribute("like-type");
        let resolved = if !type_name.is_empty() {
            match self.lookup(type_name, &body_context) {
                None => {
                    self.error(submodule, format!("'{}': no such module type", type_name));
                    None
                }
                Some(info) if !info.tag().is_module_type() => {
                    self.error(submodule, format!("'{}' is not a module type", type_name));
                    None
                }
                Some(info) => Some(info),
            }
        } else if !like_type.is_empty() {
            match self.lookup(like_type, &body_context) {
                None => {
                    self.error(
                        submodule,
                        format!("'{}': no such module interface type", like_type),
                    );
                    None
                }
                Some(info) if info.tag() != Tag::ModuleInterface => {
                    self.error(
                        submodule,
                        format!("'{}' is not a module interface type", like_type),
                    );
                    None
                }
                Some(info) => Some(info),
            }
        } else {
            return Err(InternalFault::submodule_without_type(submodule.name()));
        };

        self.scope.push(Frame::Submodule {
            element: Arc::clone(submodule),
            resolved,
        });
        let result = self.validate_children(submodule);
        self.scope.pop();
        result
    }

    fn validate_channel_spec(&mut self, spec: &Arc<Element>) -> Result<(), InternalFault> {
        let (_, owner, _) = self.current_type(Tag::ChannelSpec)?;
        let body_context = LookupContext::Type(owner);

        let type_name = spec.attribute("type");
        let like_type = spec.attribute("like-type");
        let resolved = if !type_name.is_empty() {
            match self.lookup(type_name, &body_context) {
                None => {
                    self.error(spec, format!("'{}': no such channel type", type_name));
                    None
                }
                Some(info) if info.tag() != Tag::Channel => {
                    self.error(spec, format!("'{}' is not a channel type", type_name));
                    None
                }
                Some(info) => Some(info),
            }
        } else if !like_type.is_empty() {
            match self.lookup(like_type, &body_context) {
                None => {
                    self.error(
                        spec,
                        format!("'{}': no such channel or channel interface type", like_type),
                    );
                    None
                }
                Some(info) if info.tag() != Tag::ChannelInterface => {
                    self.error(
                        spec,
                        format!("'{}' is not a channel interface type", like_type),
                    );
                    None
                }
                Some(info) => Some(info),
            }
        } else {
            let default = &self.config.default_channel_type;
            match self.resolver.lookup_toplevel_type(default, self.project) {
                Some(info) => Some(info),
                None => return Err(InternalFault::missing_default_channel(default.as_str())),
            }
        };

        self.scope.push(Frame::ChannelSpec {
            element: Arc::clone(spec),
            resolved,
        });
        let result = self.validate_children(spec);
        self.scope.pop();
        result
    }
}

// ============================================================================
// CONVENIENCE
// ============================================================================

/// Validate a tree with default settings, reporting into `sink`.
pub fn validate_tree<R, S>(
    root: &Arc<Element>,
    resolver: &R,
    project: &str,
    sink: &mut S,
) -> Result<(), InternalFault>
where
    R: TypeResolver + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    NedValidator::new(resolver, project, sink).validate(root)
}

/// Validate a tree and return its diagnostics.
pub fn check_file<R>(
    root: &Arc<Element>,
    resolver: &R,
    project: &str,
) -> Result<Vec<Diagnostic>, InternalFault>
where
    R: TypeResolver + ?Sized,
{
    let mut collector = DiagnosticCollector::new();
    validate_tree(root, resolver, project, &mut collector)?;
    Ok(collector.take())
}
