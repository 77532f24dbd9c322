//! Option functions for an embedded `ObjectMeta`.
//!
//! The embedded type is never introspected; the option set mirrors the
//! Kubernetes identity/lifecycle metadata shape and is fixed.

use std::fmt::{self, Write};

use super::{BlockKind, FunctionBlock, TARGET};
use crate::conventions::Conventions;

/// How an option writes into its member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSetter {
    /// `obj.Member = param`
    Assign {
        param: &'static str,
        ty: MetaType,
    },
    /// `obj.Member[k] = v` on a `map[string]string`
    MapEntry,
    /// `obj.Member = append(obj.Member, param)` on a `[]string`
    Append { param: &'static str },
}

/// Parameter types used by the metadata options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    String,
    /// `<meta_package>.Time`
    Time,
    /// `*<meta_package>.Time`
    TimePointer,
}

impl MetaType {
    fn render(self, conventions: &Conventions) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Time => format!("{}.Time", conventions.meta_package),
            Self::TimePointer => format!("*{}.Time", conventions.meta_package),
        }
    }
}

/// One entry of the fixed metadata option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaOption {
    /// Appended to the option prefix (`With` + `Label`).
    pub suffix: &'static str,
    /// The promoted `ObjectMeta` member written to.
    pub member: &'static str,
    /// Doc comment text between the function name and the owner type.
    pub summary: &'static str,
    pub setter: MetaSetter,
}

pub const OBJECT_META_OPTIONS: [MetaOption; 7] = [
    MetaOption {
        suffix: "Name",
        member: "Name",
        summary: "sets the name of the",
        setter: MetaSetter::Assign {
            param: "name",
            ty: MetaType::String,
        },
    },
    MetaOption {
        suffix: "Namespace",
        member: "Namespace",
        summary: "sets the namespace of the",
        setter: MetaSetter::Assign {
            param: "namespace",
            ty: MetaType::String,
        },
    },
    MetaOption {
        suffix: "Label",
        member: "Labels",
        summary: "sets a label of the",
        setter: MetaSetter::MapEntry,
    },
    MetaOption {
        suffix: "Annotation",
        member: "Annotations",
        summary: "sets an annotation of the",
        setter: MetaSetter::MapEntry,
    },
    MetaOption {
        suffix: "Finalizer",
        member: "Finalizers",
        summary: "appends a finalizer to the",
        setter: MetaSetter::Append { param: "f" },
    },
    MetaOption {
        suffix: "CreationTimestamp",
        member: "CreationTimestamp",
        summary: "sets the creation timestamp of the",
        setter: MetaSetter::Assign {
            param: "timestamp",
            ty: MetaType::Time,
        },
    },
    MetaOption {
        suffix: "DeletionTimestamp",
        member: "DeletionTimestamp",
        summary: "sets the deletion timestamp of the",
        setter: MetaSetter::Assign {
            param: "timestamp",
            ty: MetaType::TimePointer,
        },
    },
];

/// Generates every metadata option for `owner`, in table order.
pub fn generate_object_meta_options(
    owner: &str,
    conventions: &Conventions,
) -> Result<Vec<FunctionBlock>, fmt::Error> {
    OBJECT_META_OPTIONS
        .iter()
        .map(|option| generate_meta_option(owner, option, conventions))
        .collect()
}

fn generate_meta_option(
    owner: &str,
    option: &MetaOption,
    conventions: &Conventions,
) -> Result<FunctionBlock, fmt::Error> {
    let name = conventions.option_name(option.suffix);
    let member = option.member;
    let mut out = String::new();

    match option.setter {
        MetaSetter::Assign { param, ty } => {
            writeln!(out, "// {name} {} {owner}", option.summary)?;
            writeln!(
                out,
                "func {name}({param} {}) func(*{owner}) {{",
                ty.render(conventions)
            )?;
            writeln!(out, "\treturn func({TARGET} *{owner}) {{")?;
            writeln!(out, "\t\t{TARGET}.{member} = {param}")?;
        }
        MetaSetter::MapEntry => {
            if conventions.guard_nil_maps {
                writeln!(
                    out,
                    "// {name} {} {owner}, allocating {member} when it is nil",
                    option.summary
                )?;
            } else {
                writeln!(out, "// {name} {} {owner}", option.summary)?;
                writeln!(out, "// {member} must already be initialized when the option runs")?;
            }
            writeln!(out, "func {name}(k, v string) func(*{owner}) {{")?;
            writeln!(out, "\treturn func({TARGET} *{owner}) {{")?;
            if conventions.guard_nil_maps {
                writeln!(out, "\t\tif {TARGET}.{member} == nil {{")?;
                writeln!(out, "\t\t\t{TARGET}.{member} = map[string]string{{}}")?;
                writeln!(out, "\t\t}}")?;
            }
            writeln!(out, "\t\t{TARGET}.{member}[k] = v")?;
        }
        MetaSetter::Append { param } => {
            writeln!(out, "// {name} {} {owner}", option.summary)?;
            writeln!(out, "func {name}({param} string) func(*{owner}) {{")?;
            writeln!(out, "\treturn func({TARGET} *{owner}) {{")?;
            writeln!(
                out,
                "\t\t{TARGET}.{member} = append({TARGET}.{member}, {param})"
            )?;
        }
    }

    writeln!(out, "\t}}")?;
    writeln!(out, "}}")?;

    Ok(FunctionBlock {
        name,
        owner: owner.to_string(),
        kind: BlockKind::MetadataOption,
        text: out,
    })
}
