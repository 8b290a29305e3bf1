//! Typed views of enumerated attribute values.
//!
//! Attributes are stored as strings; these enums give the validator a closed
//! set to match on. `parse` returns `None` for values outside the DTD's
//! enumeration.

/// Declared direction of a gate. `None` means the gate element is a usage,
/// not a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GateType {
    #[default]
    None,
    Input,
    Output,
    Inout,
}

impl GateType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::None),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "inout" => Some(Self::Inout),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
        }
    }
}

/// Declared type of a parameter. `None` means an assignment, not a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamType {
    #[default]
    None,
    Double,
    Int,
    String,
    Bool,
    Xml,
}

impl ParamType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::None),
            "double" => Some(Self::Double),
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Double => "double",
            Self::Int => "int",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Xml => "xml",
        }
    }
}

/// Arrow of a connection (`-->`, `<--`, `<-->`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    Bidirectional,
}

impl ArrowDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "l2r" => Some(Self::LeftToRight),
            "r2l" => Some(Self::RightToLeft),
            "bidir" => Some(Self::Bidirectional),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftToRight => "l2r",
            Self::RightToLeft => "r2l",
            Self::Bidirectional => "bidir",
        }
    }
}

/// Half of an inout gate selected with `$i` / `$o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Subgate {
    #[default]
    None,
    Input,
    Output,
}

impl Subgate {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::None),
            "i" => Some(Self::Input),
            "o" => Some(Self::Output),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Input => "i",
            Self::Output => "o",
        }
    }

    /// Suffix as written in source (`$i`, `$o`, or nothing).
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Input => "$i",
            Self::Output => "$o",
        }
    }
}

/// Parse a DTD boolean (`true` / `false`).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
