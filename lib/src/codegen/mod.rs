//! Go code generation for annotated types.
//!
//! Each generator returns a [`FunctionBlock`]: one complete top-level Go function,
//! doc comment included, ending in `}\n`. Blocks are assembled into a file by
//! [`crate::output`].
//!
//! ## Submodules
//!
//! - [`constructor`] - `New<T>(opts ...func(*T)) *T`
//! - [`field_option`] - `With<Field>(value) func(*T)` per named field
//! - [`object_meta`] - the fixed option set for an embedded `ObjectMeta`

pub mod constructor;
pub mod field_option;
pub mod object_meta;

pub use constructor::generate_constructor;
pub use field_option::generate_field_option;
pub use object_meta::{OBJECT_META_OPTIONS, generate_object_meta_options};

/// What a generated function is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Constructor,
    FieldOption,
    MetadataOption,
}

/// One generated top-level Go function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBlock {
    /// The Go function name (`NewPod`, `WithReplicas`).
    pub name: String,
    /// The type the function builds or configures.
    pub owner: String,
    pub kind: BlockKind,
    /// Source text, ending with the closing brace and a newline.
    pub text: String,
}

const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// The receiver name used inside every generated closure.
pub(crate) const TARGET: &str = "obj";

/// Derives an option's parameter name from a field name.
///
/// The lower-cased field name is used as-is unless it would not compile:
/// Go keywords and the closure's own receiver name get a trailing underscore.
///
/// ## Examples
///
/// ```
/// use gobuilder_lib::codegen::parameter_name;
///
/// assert_eq!(parameter_name("ServiceAccountName"), "serviceaccountname");
/// assert_eq!(parameter_name("Type"), "type_");
/// ```
pub fn parameter_name(field: &str) -> String {
    let lower = field.to_lowercase();
    if lower == TARGET || GO_KEYWORDS.contains(&lower.as_str()) {
        format!("{lower}_")
    } else {
        lower
    }
}

/// Quotes text as a Go interpreted string literal.
pub fn go_string_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_names_are_lower_cased() {
        assert_eq!(parameter_name("RestartPolicy"), "restartpolicy");
        assert_eq!(parameter_name("URL"), "url");
    }

    #[test]
    fn keyword_and_receiver_collisions_are_escaped() {
        assert_eq!(parameter_name("Type"), "type_");
        assert_eq!(parameter_name("Default"), "default_");
        assert_eq!(parameter_name("Obj"), "obj_");
        assert_eq!(parameter_name("Types"), "types");
    }

    #[test]
    fn string_literals_escape_quotes_and_backslashes() {
        assert_eq!(go_string_literal("Pod"), "\"Pod\"");
        assert_eq!(
            go_string_literal("stack.civo.com/v1alpha1"),
            "\"stack.civo.com/v1alpha1\""
        );
        assert_eq!(go_string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
