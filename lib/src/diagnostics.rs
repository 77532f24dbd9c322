//! Diagnostics for output that was generated but is known to be incomplete.

use std::fmt;

/// A degraded-output signal collected alongside generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A field type could not be rendered; the option carries a placeholder.
    UnsupportedType {
        type_name: String,
        field: String,
        shape: String,
    },
    /// An embedded member produced no option functions.
    SkippedEmbedded { type_name: String, relation: String },
    /// A marked struct with type parameters was not generated.
    SkippedGeneric { type_name: String },
    /// A later declaration with the same name replaced an earlier one.
    ShadowedDeclaration { type_name: String },
    /// The same function name was emitted more than once in one file.
    DuplicateFunction { name: String, type_name: String },
    /// The assembled output does not re-parse cleanly.
    MalformedOutput { line: usize, column: usize },
}

impl Warning {
    /// Short machine-friendly label for the warning kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::SkippedEmbedded { .. } => "skipped_embedded",
            Self::SkippedGeneric { .. } => "skipped_generic",
            Self::ShadowedDeclaration { .. } => "shadowed_declaration",
            Self::DuplicateFunction { .. } => "duplicate_function",
            Self::MalformedOutput { .. } => "malformed_output",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType {
                type_name,
                field,
                shape,
            } => write!(
                formatter,
                "{type_name}.{field} has an unsupported type shape `{shape}`"
            ),
            Self::SkippedEmbedded {
                type_name,
                relation,
            } => write!(
                formatter,
                "embedded `{relation}` in {type_name} has no builder convention"
            ),
            Self::SkippedGeneric { type_name } => write!(
                formatter,
                "{type_name} has type parameters; generic structs are not generated"
            ),
            Self::ShadowedDeclaration { type_name } => write!(
                formatter,
                "{type_name} is declared more than once; the last one wins"
            ),
            Self::DuplicateFunction { name, type_name } => write!(
                formatter,
                "{name} (for {type_name}) is already defined in this file"
            ),
            Self::MalformedOutput { line, column } => write!(
                formatter,
                "generated code has a syntax error at {line}:{column}"
            ),
        }
    }
}
