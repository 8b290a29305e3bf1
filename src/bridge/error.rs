//! Bridge errors.
//!
//! These are integrity failures of the native engine or of the conversion
//! itself. Problems in the parsed source are never reported this way; they
//! travel as diagnostics.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("native tree contains unknown element code {code}")]
    UnknownTag { code: u16 },

    #[error("native message has unknown severity code {code}: {text}")]
    UnknownSeverity { code: i32, text: String },

    #[error("tree fails DTD validation even after repairs: {first}")]
    DtdViolation { count: usize, first: String },

    #[error("problems lost in translation: {native} native messages, {delivered} delivered")]
    LostDiagnostics { native: usize, delivered: usize },
}

impl BridgeError {
    pub fn unknown_severity(code: i32, text: impl Into<String>) -> Self {
        Self::UnknownSeverity {
            code,
            text: text.into(),
        }
    }
}
