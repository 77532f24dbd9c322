//! Constructor generation.

use std::fmt::{self, Write};

use super::{BlockKind, FunctionBlock, TARGET, go_string_literal};
use crate::conventions::Conventions;

/// Generates `New<T>` for an annotated type.
///
/// Top-level resource types (names without an identity-exempt substring such as
/// `Spec` or `Status`) get their `TypeMeta` filled in:
///
/// ```text
/// // NewPod returns a Pod object with the given options
/// func NewPod(opts ...func(*Pod)) *Pod {
/// 	obj := &Pod{
/// 		TypeMeta: v1.TypeMeta{
/// 			Kind:       "Pod",
/// 			APIVersion: "stack.civo.com/v1alpha1",
/// 		},
/// 	}
///
/// 	for _, f := range opts {
/// 		f(obj)
/// 	}
///
/// 	return obj
/// }
/// ```
///
/// ## Errors
/// Only fails if writing into the buffer fails.
pub fn generate_constructor(
    type_name: &str,
    conventions: &Conventions,
) -> Result<FunctionBlock, fmt::Error> {
    let name = conventions.constructor_name(type_name);
    let mut out = String::new();

    writeln!(out, "// {name} returns a {type_name} object with the given options")?;
    writeln!(out, "func {name}(opts ...func(*{type_name})) *{type_name} {{")?;

    if conventions.wants_type_identity(type_name) {
        let meta = &conventions.type_meta_field;
        writeln!(out, "\t{TARGET} := &{type_name}{{")?;
        writeln!(out, "\t\t{meta}: {}.{meta}{{", conventions.meta_package)?;
        writeln!(out, "\t\t\tKind:       {},", go_string_literal(type_name))?;
        writeln!(
            out,
            "\t\t\tAPIVersion: {},",
            go_string_literal(&conventions.api_version)
        )?;
        writeln!(out, "\t\t}},")?;
        writeln!(out, "\t}}")?;
    } else {
        writeln!(out, "\t{TARGET} := &{type_name}{{}}")?;
    }

    writeln!(out)?;
    writeln!(out, "\tfor _, f := range opts {{")?;
    writeln!(out, "\t\tf({TARGET})")?;
    writeln!(out, "\t}}")?;
    writeln!(out)?;
    writeln!(out, "\treturn {TARGET}")?;
    writeln!(out, "}}")?;

    Ok(FunctionBlock {
        name,
        owner: type_name.to_string(),
        kind: BlockKind::Constructor,
        text: out,
    })
}
