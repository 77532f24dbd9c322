//! Option functions for named struct fields.

use std::fmt::{self, Write};

use super::{BlockKind, FunctionBlock, TARGET, parameter_name};
use crate::conventions::Conventions;
use crate::model::Field;
use crate::render::render;

/// Generates the `With<Field>` option for one named field of `owner`.
///
/// ```text
/// // WithRestartPolicy sets the RestartPolicy of a PodSpec
/// func WithRestartPolicy(restartpolicy RestartPolicy) func(*PodSpec) {
/// 	return func(obj *PodSpec) {
/// 		obj.RestartPolicy = restartpolicy
/// 	}
/// }
/// ```
pub fn generate_field_option(
    owner: &str,
    field: &Field,
    conventions: &Conventions,
) -> Result<FunctionBlock, fmt::Error> {
    let name = conventions.option_name(&field.name);
    let param = parameter_name(&field.name);
    let ty = render(&field.ty);
    let member = &field.name;
    let mut out = String::new();

    writeln!(out, "// {name} sets the {member} of a {owner}")?;
    writeln!(out, "func {name}({param} {ty}) func(*{owner}) {{")?;
    writeln!(out, "\treturn func({TARGET} *{owner}) {{")?;
    writeln!(out, "\t\t{TARGET}.{member} = {param}")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "}}")?;

    Ok(FunctionBlock {
        name,
        owner: owner.to_string(),
        kind: BlockKind::FieldOption,
        text: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeExpr;

    fn field(name: &str, ty: TypeExpr) -> Field {
        Field {
            name: name.to_string(),
            ty,
        }
    }

    #[test]
    fn assigns_the_parameter_to_the_member() {
        let block = generate_field_option(
            "PodSpec",
            &field("RestartPolicy", TypeExpr::ident("RestartPolicy")),
            &Conventions::default(),
        )
        .unwrap();

        assert_eq!(block.name, "WithRestartPolicy");
        assert_eq!(
            block.text,
            "// WithRestartPolicy sets the RestartPolicy of a PodSpec
func WithRestartPolicy(restartpolicy RestartPolicy) func(*PodSpec) {
\treturn func(obj *PodSpec) {
\t\tobj.RestartPolicy = restartpolicy
\t}
}
"
        );
    }

    #[test]
    fn renders_composite_parameter_types() {
        let block = generate_field_option(
            "Pod",
            &field(
                "NodeSelector",
                TypeExpr::map(TypeExpr::ident("string"), TypeExpr::ident("string")),
            ),
            &Conventions::default(),
        )
        .unwrap();
        assert!(
            block
                .text
                .contains("func WithNodeSelector(nodeselector map[string]string) func(*Pod) {")
        );
    }

    #[test]
    fn keyword_fields_get_escaped_parameters() {
        let block = generate_field_option(
            "Condition",
            &field("Type", TypeExpr::ident("ConditionType")),
            &Conventions::default(),
        )
        .unwrap();
        assert!(
            block
                .text
                .contains("func WithType(type_ ConditionType) func(*Condition) {")
        );
        assert!(block.text.contains("\t\tobj.Type = type_\n"));
    }
}
