//! Tree builders shared by the semantic tests.

use std::sync::Arc;

use crate::semantic::{Diagnostic, InternalFault, TypeIndex, check_file};
use crate::syntax::{Element, ElementBuilder, Tag};

pub const PROJECT: &str = "demo";
pub const NET_FILE: &str = "demo/net.ned";

// ============================================================================
// ELEMENTS
// ============================================================================

pub fn ned_file(
    filename: &str,
    package: Option<&str>,
    imports: &[&str],
    types: Vec<Arc<Element>>,
) -> Arc<Element> {
    let mut file = Element::build(Tag::NedFile).attr("filename", filename);
    if let Some(package) = package {
        file.push_child(Element::build(Tag::Package).attr("name", package).finish());
    }
    for spec in imports {
        file.push_child(Element::build(Tag::Import).attr("import-spec", *spec).finish());
    }
    file.children(types).finish()
}

/// A type declaration with its sections (extends, parameters, gates, ...).
pub fn declare(tag: Tag, name: &str, sections: Vec<Arc<Element>>) -> Arc<Element> {
    Element::build(tag)
        .attr("name", name)
        .location(format!("{NET_FILE}:{name}"))
        .children(sections)
        .finish()
}

pub fn extends(name: &str) -> Arc<Element> {
    Element::build(Tag::Extends).attr("name", name).finish()
}

pub fn like(name: &str) -> Arc<Element> {
    Element::build(Tag::InterfaceName).attr("name", name).finish()
}

fn section(tag: Tag, children: Vec<Arc<Element>>) -> Arc<Element> {
    Element::build(tag).children(children).finish()
}

pub fn parameters(children: Vec<Arc<Element>>) -> Arc<Element> {
    section(Tag::Parameters, children)
}

pub fn gates(children: Vec<Arc<Element>>) -> Arc<Element> {
    section(Tag::Gates, children)
}

pub fn types(children: Vec<Arc<Element>>) -> Arc<Element> {
    section(Tag::Types, children)
}

pub fn submodules(children: Vec<Arc<Element>>) -> Arc<Element> {
    section(Tag::Submodules, children)
}

pub fn connections(children: Vec<Arc<Element>>) -> Arc<Element> {
    section(Tag::Connections, children)
}

pub fn param_decl(param_type: &str, name: &str) -> Arc<Element> {
    Element::build(Tag::Param)
        .attr("type", param_type)
        .attr("name", name)
        .location(format!("{NET_FILE}:param {name}"))
        .finish()
}

pub fn param_assign(name: &str, value: &str) -> Arc<Element> {
    Element::build(Tag::Param)
        .attr("name", name)
        .attr("value", value)
        .finish()
}

pub fn gate_decl(gate_type: &str, name: &str, vector: bool) -> Arc<Element> {
    Element::build(Tag::Gate)
        .attr("type", gate_type)
        .attr("name", name)
        .attr("is-vector", if vector { "true" } else { "false" })
        .location(format!("{NET_FILE}:gate {name}"))
        .finish()
}

/// A gate sizing or usage, without a direction.
pub fn gate_use(name: &str, vector: bool) -> Arc<Element> {
    Element::build(Tag::Gate)
        .attr("name", name)
        .attr("is-vector", if vector { "true" } else { "false" })
        .finish()
}

pub fn submodule(name: &str, type_name: &str) -> ElementBuilder {
    Element::build(Tag::Submodule)
        .attr("name", name)
        .attr("type", type_name)
        .location(format!("{NET_FILE}:submodule {name}"))
}

pub fn submodule_like(name: &str, like_type: &str) -> ElementBuilder {
    Element::build(Tag::Submodule)
        .attr("name", name)
        .attr("like-type", like_type)
        .attr("like-param", "nodeType")
}

/// `src --> dest`, where each side is `gate` or `module.gate`.
pub fn connect(src: &str, dest: &str) -> ElementBuilder {
    let (src_module, src_gate) = split_endpoint(src);
    let (dest_module, dest_gate) = split_endpoint(dest);
    Element::build(Tag::Connection)
        .attr("src-module", src_module)
        .attr("src-gate", src_gate)
        .attr("dest-module", dest_module)
        .attr("dest-gate", dest_gate)
        .attr("arrow-direction", "l2r")
}

fn split_endpoint(endpoint: &str) -> (&str, &str) {
    endpoint.split_once('.').unwrap_or(("", endpoint))
}

pub fn channel_spec(type_name: &str, children: Vec<Arc<Element>>) -> Arc<Element> {
    Element::build(Tag::ChannelSpec)
        .attr("type", type_name)
        .children(children)
        .finish()
}

// ============================================================================
// STANDARD TYPES
// ============================================================================

/// `package ned;` with the built-in channel types.
pub fn builtins() -> Arc<Element> {
    ned_file(
        "ned/channels.ned",
        Some("ned"),
        &[],
        vec![
            declare(Tag::Channel, "IdealChannel", vec![]),
            declare(
                Tag::Channel,
                "DatarateChannel",
                vec![parameters(vec![
                    param_decl("double", "delay"),
                    param_decl("double", "datarate"),
                ])],
            ),
        ],
    )
}

/// `simple Node` with scalar, vector and inout gates.
pub fn node() -> Arc<Element> {
    declare(
        Tag::SimpleModule,
        "Node",
        vec![
            parameters(vec![param_decl("double", "delay")]),
            gates(vec![
                gate_decl("input", "in", false),
                gate_decl("output", "out", false),
                gate_decl("inout", "port", false),
                gate_decl("input", "inv", true),
                gate_decl("output", "outv", true),
            ]),
        ],
    )
}

/// A compound module `Net` with an input `in` and an output `out`.
pub fn network(sections: Vec<Arc<Element>>) -> Arc<Element> {
    let mut all = vec![gates(vec![
        gate_decl("input", "in", false),
        gate_decl("output", "out", false),
    ])];
    all.extend(sections);
    declare(Tag::CompoundModule, "Net", all)
}

// ============================================================================
// RUNNING
// ============================================================================

/// Index `builtins()` plus the given files.
pub fn index_of(files: &[&Arc<Element>]) -> TypeIndex {
    let mut index = TypeIndex::new();
    index.add_file(PROJECT, &builtins());
    for file in files {
        index.add_file(PROJECT, file);
    }
    index
}

/// Index the file together with the built-ins and validate it.
pub fn check(file: &Arc<Element>) -> Result<Vec<Diagnostic>, InternalFault> {
    check_file(file, &index_of(&[file]), PROJECT)
}

/// Messages of a file that must validate without internal faults.
pub fn messages(file: &Arc<Element>) -> Vec<String> {
    check(file)
        .unwrap()
        .iter()
        .map(|diagnostic| diagnostic.message.to_string())
        .collect()
}

/// Messages of `demo/net.ned` holding `package demo;` and the given types.
pub fn messages_of(types: Vec<Arc<Element>>) -> Vec<String> {
    messages(&ned_file(NET_FILE, Some("demo"), &[], types))
}
