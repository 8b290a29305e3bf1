//! Element tags for the NED/MSG tree
//!
//! The tag set is fixed by the grammar: every element in a tree carries exactly
//! one of these kinds. Each tag also owns its attribute schema (ordered, so
//! attributes can be addressed by position) and the list of child tags it may
//! contain.

/// One attribute slot of a tag's schema.
///
/// `default == None` marks a required attribute; elements still store an
/// empty string for it until one is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

const fn req(name: &'static str) -> AttrSpec {
    AttrSpec {
        name,
        default: None,
    }
}

const fn opt(name: &'static str, default: &'static str) -> AttrSpec {
    AttrSpec {
        name,
        default: Some(default),
    }
}

macro_rules! define_tags {
    ($($variant:ident = $code:literal => $name:literal, $readable:literal;)*) => {
        /// All element kinds of the NED and MSG languages.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum Tag {
            $($variant = $code,)*
        }

        impl Tag {
            /// Every tag, in code order.
            pub const ALL: &'static [Tag] = &[$(Tag::$variant,)*];

            /// Numeric tag code, shared with the native engine.
            pub fn code(self) -> u16 {
                self as u16
            }

            pub fn from_code(code: u16) -> Option<Tag> {
                match code {
                    $($code => Some(Tag::$variant),)*
                    _ => None,
                }
            }

            /// Tag name as it appears in the DTD (e.g. `compound-module`).
            pub fn name(self) -> &'static str {
                match self {
                    $(Tag::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Tag> {
                match name {
                    $($name => Some(Tag::$variant),)*
                    _ => None,
                }
            }

            /// Human-readable kind, used in diagnostics.
            pub fn readable_name(self) -> &'static str {
                match self {
                    $(Tag::$variant => $readable,)*
                }
            }
        }
    };
}

define_tags! {
    Files = 1 => "files", "files";
    NedFile = 2 => "ned-file", "NED file";
    Comment = 3 => "comment", "comment";
    Package = 4 => "package", "package";
    Import = 5 => "import", "import";
    PropertyDecl = 6 => "property-decl", "property declaration";
    Extends = 7 => "extends", "extends";
    InterfaceName = 8 => "interface-name", "interface name";
    SimpleModule = 9 => "simple-module", "simple module";
    ModuleInterface = 10 => "module-interface", "module interface";
    CompoundModule = 11 => "compound-module", "compound module";
    ChannelInterface = 12 => "channel-interface", "channel interface";
    Channel = 13 => "channel", "channel";
    Parameters = 14 => "parameters", "parameters";
    Param = 15 => "param", "parameter";
    Pattern = 16 => "pattern", "pattern";
    Property = 17 => "property", "property";
    PropertyKey = 18 => "property-key", "property key";
    Gates = 19 => "gates", "gates";
    Gate = 20 => "gate", "gate";
    Types = 21 => "types", "types";
    Submodules = 22 => "submodules", "submodules";
    Submodule = 23 => "submodule", "submodule";
    Connections = 24 => "connections", "connections";
    Connection = 25 => "connection", "connection";
    ChannelSpec = 26 => "channel-spec", "channel spec";
    ConnectionGroup = 27 => "connection-group", "connection group";
    Loop = 28 => "loop", "loop";
    Condition = 29 => "condition", "condition";
    Expression = 30 => "expression", "expression";
    Operator = 31 => "operator", "operator";
    Function = 32 => "function", "function";
    Ident = 33 => "ident", "identifier";
    Literal = 34 => "literal", "literal";
    MsgFile = 35 => "msg-file", "MSG file";
    Namespace = 36 => "namespace", "namespace";
    Cplusplus = 37 => "cplusplus", "cplusplus block";
    StructDecl = 38 => "struct-decl", "struct declaration";
    ClassDecl = 39 => "class-decl", "class declaration";
    MessageDecl = 40 => "message-decl", "message declaration";
    PacketDecl = 41 => "packet-decl", "packet declaration";
    EnumDecl = 42 => "enum-decl", "enum declaration";
    Enum = 43 => "enum", "enum";
    EnumFields = 44 => "enum-fields", "enum fields";
    EnumField = 45 => "enum-field", "enum field";
    Message = 46 => "message", "message";
    Packet = 47 => "packet", "packet";
    Class = 48 => "class", "class";
    Struct = 49 => "struct", "struct";
    Fields = 50 => "fields", "fields";
    Field = 51 => "field", "field";
    Unknown = 52 => "unknown", "unknown element";
}

const NONE: &[AttrSpec] = &[];
const NAME_ONLY: &[AttrSpec] = &[req("name")];
const MSG_TYPE: &[AttrSpec] = &[req("name"), opt("extends-name", ""), opt("source-code", "")];
const FILE_ATTRS: &[AttrSpec] = &[opt("filename", ""), opt("version", "2")];
const COMMENT_ATTRS: &[AttrSpec] = &[req("locid"), opt("content", "")];
const IMPORT_ATTRS: &[AttrSpec] = &[req("import-spec")];
const PROPERTY_DECL_ATTRS: &[AttrSpec] = &[req("name"), opt("is-array", "false")];
const PARAMETERS_ATTRS: &[AttrSpec] = &[opt("is-implicit", "false")];
const PARAM_ATTRS: &[AttrSpec] = &[
    opt("type", ""),
    opt("is-volatile", "false"),
    req("name"),
    opt("value", ""),
    opt("is-pattern", "false"),
    opt("is-default", "false"),
];
const PATTERN_ATTRS: &[AttrSpec] = &[req("pattern"), opt("value", ""), opt("is-default", "false")];
const PROPERTY_ATTRS: &[AttrSpec] = &[opt("is-implicit", "false"), req("name"), opt("index", "")];
const PROPERTY_KEY_ATTRS: &[AttrSpec] = &[opt("name", "")];
const GATE_ATTRS: &[AttrSpec] = &[
    req("name"),
    opt("type", ""),
    opt("is-vector", "false"),
    opt("vector-size", ""),
];
const SUBMODULE_ATTRS: &[AttrSpec] = &[
    req("name"),
    opt("type", ""),
    opt("like-type", ""),
    opt("like-param", ""),
    opt("vector-size", ""),
];
const CONNECTIONS_ATTRS: &[AttrSpec] = &[opt("allow-unconnected", "false")];
const CONNECTION_ATTRS: &[AttrSpec] = &[
    opt("src-module", ""),
    opt("src-module-index", ""),
    req("src-gate"),
    opt("src-gate-plusplus", "false"),
    opt("src-gate-index", ""),
    opt("src-gate-subg", ""),
    opt("dest-module", ""),
    opt("dest-module-index", ""),
    req("dest-gate"),
    opt("dest-gate-plusplus", "false"),
    opt("dest-gate-index", ""),
    opt("dest-gate-subg", ""),
    req("arrow-direction"),
];
const CHANNEL_SPEC_ATTRS: &[AttrSpec] = &[
    opt("type",
    ""),
    opt("like-type",
    ""),
    opt("like-param",
    ""),
];
const LOOP_ATTRS: &[AttrSpec] = &[req("param-name"), opt("from-value", ""), opt("to-value", "")];
const CONDITION_ATTRS: &[AttrSpec] = &[opt("condition", "")];
const EXPRESSION_ATTRS: &[AttrSpec] = &[opt("target", "")];
const IDENT_ATTRS: &[AttrSpec] = &[opt("module", ""), opt("module-index", ""), req("name")];
const LITERAL_ATTRS: &[AttrSpec] = &[
    req("type"),
    opt("unit",
    ""),
    opt("text",
    ""),
    opt("value",
    ""),
];
const CPLUSPLUS_ATTRS: &[AttrSpec] = &[req("body")];
const CLASS_DECL_ATTRS: &[AttrSpec] = &[req("name"), opt("is-cobject", "false")];
const ENUM_FIELD_ATTRS: &[AttrSpec] = &[req("name"), opt("value", "")];
const FIELD_ATTRS: &[AttrSpec] = &[
    req("name"),
    opt("data-type", ""),
    opt("is-abstract", "false"),
    opt("is-readonly", "false"),
    opt("is-vector", "false"),
    opt("vector-size", ""),
    opt("default-value", ""),
];
const UNKNOWN_ATTRS: &[AttrSpec] = &[req("element")];

const EXPR_CHILDREN: &[Tag] = &[
    Tag::Comment,
    Tag::Operator,
    Tag::Function,
    Tag::Ident,
    Tag::Literal,
];
const COMMENT_ONLY: &[Tag] = &[Tag::Comment];
const MSG_TYPE_CHILDREN: &[Tag] = &[Tag::Comment, Tag::Property, Tag::Fields];
const NED_TYPES: &[Tag] = &[
    Tag::Comment,
    Tag::SimpleModule,
    Tag::ModuleInterface,
    Tag::CompoundModule,
    Tag::ChannelInterface,
    Tag::Channel,
];

impl Tag {
    /// Ordered attribute schema of this tag.
    pub fn attributes(self) -> &'static [AttrSpec] {
        match self {
            Tag::Files
            | Tag::Gates
            | Tag::Types
            | Tag::Submodules
            | Tag::ConnectionGroup
            | Tag::EnumFields
            | Tag::Fields => NONE,
            Tag::NedFile | Tag::MsgFile => FILE_ATTRS,
            Tag::Comment => COMMENT_ATTRS,
            Tag::Import => IMPORT_ATTRS,
            Tag::PropertyDecl => PROPERTY_DECL_ATTRS,
            Tag::Package
            | Tag::Extends
            | Tag::InterfaceName
            | Tag::SimpleModule
            | Tag::ModuleInterface
            | Tag::CompoundModule
            | Tag::ChannelInterface
            | Tag::Channel
            | Tag::Operator
            | Tag::Function
            | Tag::Namespace
            | Tag::StructDecl
            | Tag::MessageDecl
            | Tag::PacketDecl
            | Tag::EnumDecl => NAME_ONLY,
            Tag::Parameters => PARAMETERS_ATTRS,
            Tag::Param => PARAM_ATTRS,
            Tag::Pattern => PATTERN_ATTRS,
            Tag::Property => PROPERTY_ATTRS,
            Tag::PropertyKey => PROPERTY_KEY_ATTRS,
            Tag::Gate => GATE_ATTRS,
            Tag::Submodule => SUBMODULE_ATTRS,
            Tag::Connections => CONNECTIONS_ATTRS,
            Tag::Connection => CONNECTION_ATTRS,
            Tag::ChannelSpec => CHANNEL_SPEC_ATTRS,
            Tag::Loop => LOOP_ATTRS,
            Tag::Condition => CONDITION_ATTRS,
            Tag::Expression => EXPRESSION_ATTRS,
            Tag::Ident => IDENT_ATTRS,
            Tag::Literal => LITERAL_ATTRS,
            Tag::Cplusplus => CPLUSPLUS_ATTRS,
            Tag::ClassDecl => CLASS_DECL_ATTRS,
            Tag::Enum | Tag::Message | Tag::Packet | Tag::Class | Tag::Struct => MSG_TYPE,
            Tag::EnumField => ENUM_FIELD_ATTRS,
            Tag::Field => FIELD_ATTRS,
            Tag::Unknown => UNKNOWN_ATTRS,
        }
    }

    /// Position of the named attribute in this tag's schema.
    pub fn attribute_index(self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|spec| spec.name == name)
    }

    /// Child tags that may appear under this tag. `Unknown` is accepted
    /// everywhere and is not listed.
    pub fn allowed_children(self) -> &'static [Tag] {
        match self {
            Tag::Files => &[Tag::NedFile, Tag::MsgFile],
            Tag::NedFile => &[
                Tag::Comment,
                Tag::Package,
                Tag::Import,
                Tag::PropertyDecl,
                Tag::Property,
                Tag::SimpleModule,
                Tag::ModuleInterface,
                Tag::CompoundModule,
                Tag::ChannelInterface,
                Tag::Channel,
            ],
            Tag::Comment | Tag::Literal => &[],
            Tag::Package
            | Tag::Import
            | Tag::Extends
            | Tag::InterfaceName
            | Tag::Namespace
            | Tag::Cplusplus
            | Tag::StructDecl
            | Tag::ClassDecl
            | Tag::MessageDecl
            | Tag::PacketDecl
            | Tag::EnumDecl
            | Tag::EnumField => COMMENT_ONLY,
            Tag::PropertyDecl => &[Tag::Comment, Tag::PropertyKey, Tag::Property],
            Tag::SimpleModule => &[
                Tag::Comment,
                Tag::Extends,
                Tag::InterfaceName,
                Tag::Parameters,
                Tag::Gates,
            ],
            Tag::ModuleInterface => &[Tag::Comment, Tag::Extends, Tag::Parameters, Tag::Gates],
            Tag::CompoundModule => &[
                Tag::Comment,
                Tag::Extends,
                Tag::InterfaceName,
                Tag::Parameters,
                Tag::Gates,
                Tag::Types,
                Tag::Submodules,
                Tag::Connections,
            ],
            Tag::ChannelInterface => &[Tag::Comment, Tag::Extends, Tag::Parameters],
            Tag::Channel => &[
                Tag::Comment,
                Tag::Extends,
                Tag::InterfaceName,
                Tag::Parameters,
            ],
            Tag::Parameters => &[Tag::Comment, Tag::Property, Tag::Param, Tag::Pattern],
            Tag::Param | Tag::Pattern | Tag::Gate => {
                &[Tag::Comment, Tag::Expression, Tag::Property]
            }
            Tag::Property => &[Tag::Comment, Tag::PropertyKey],
            Tag::PropertyKey => &[Tag::Comment, Tag::Literal],
            Tag::Gates => &[Tag::Comment, Tag::Gate],
            Tag::Types => NED_TYPES,
            Tag::Submodules => &[Tag::Comment, Tag::Submodule],
            Tag::Submodule => &[Tag::Comment, Tag::Expression, Tag::Parameters, Tag::Gates],
            Tag::Connections => &[Tag::Comment, Tag::Connection, Tag::ConnectionGroup],
            Tag::Connection => &[
                Tag::Comment,
                Tag::Expression,
                Tag::ChannelSpec,
                Tag::Loop,
                Tag::Condition,
            ],
            Tag::ChannelSpec => &[Tag::Comment, Tag::Expression, Tag::Parameters],
            Tag::ConnectionGroup => &[Tag::Comment, Tag::Loop, Tag::Condition, Tag::Connection],
            Tag::Loop | Tag::Condition => &[Tag::Comment, Tag::Expression],
            Tag::Expression | Tag::Operator | Tag::Function | Tag::Ident => EXPR_CHILDREN,
            Tag::MsgFile => &[
                Tag::Comment,
                Tag::Namespace,
                Tag::PropertyDecl,
                Tag::Property,
                Tag::Cplusplus,
                Tag::StructDecl,
                Tag::ClassDecl,
                Tag::MessageDecl,
                Tag::PacketDecl,
                Tag::EnumDecl,
                Tag::Struct,
                Tag::Class,
                Tag::Message,
                Tag::Packet,
                Tag::Enum,
            ],
            Tag::Enum => &[Tag::Comment, Tag::EnumFields],
            Tag::EnumFields => &[Tag::Comment, Tag::EnumField],
            Tag::Message | Tag::Packet | Tag::Class | Tag::Struct => MSG_TYPE_CHILDREN,
            Tag::Fields => &[Tag::Comment, Tag::Field],
            Tag::Field => &[Tag::Comment, Tag::Property],
            Tag::Unknown => Tag::ALL,
        }
    }

    /// Whether `child` may appear directly under this tag.
    pub fn allows_child(self, child: Tag) -> bool {
        child == Tag::Unknown || self.allowed_children().contains(&child)
    }

    /// Section-like children that may occur at most once under one parent.
    pub fn is_singleton_child(self) -> bool {
        matches!(
            self,
            Tag::Package
                | Tag::Parameters
                | Tag::Gates
                | Tag::Types
                | Tag::Submodules
                | Tag::Connections
                | Tag::ChannelSpec
                | Tag::EnumFields
                | Tag::Fields
        )
    }

    /// The five NED type declarations (modules, interfaces, channels).
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Tag::SimpleModule
                | Tag::ModuleInterface
                | Tag::CompoundModule
                | Tag::ChannelInterface
                | Tag::Channel
        )
    }

    /// Concrete module types, i.e. what a submodule may be instantiated from.
    pub fn is_module_type(self) -> bool {
        matches!(self, Tag::SimpleModule | Tag::CompoundModule)
    }

    /// Module types and module interfaces (the "module" side of the language).
    pub fn is_module_like(self) -> bool {
        matches!(
            self,
            Tag::SimpleModule | Tag::CompoundModule | Tag::ModuleInterface
        )
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
