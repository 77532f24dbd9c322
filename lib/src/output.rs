//! Synthesis and assembly of the generated Go file.
//!
//! [`synthesize`] turns a [`SourceUnit`] into a [`GeneratedUnit`]: the package
//! clause, the verbatim import block and one [`FunctionBlock`] per generated
//! function. The assembled text is re-parsed before it is handed back so that a
//! malformed result shows up as a warning instead of a surprise at compile time.
//!
//! ## Output Structure
//!
//! ```text
//! package v1alpha1
//!
//! import (
//! 	"k8s.io/apimachinery/pkg/apis/meta/v1"
//! )
//!
//! // NewPod returns a Pod object with the given options
//! func NewPod(opts ...func(*Pod)) *Pod { ... }
//!
//! // WithServiceAccountName sets the ServiceAccountName of a Pod
//! func WithServiceAccountName(serviceaccountname string) func(*Pod) { ... }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::codegen::{
    FunctionBlock, generate_constructor, generate_field_option, generate_object_meta_options,
};
use crate::conventions::Conventions;
use crate::diagnostics::Warning;
use crate::error::BuilderGenError;
use crate::model::{AnnotatedType, EmbeddedRelation, ImportSpec, Member, SourceUnit};
use crate::scan::{first_syntax_error, parse_go};

/// The synthesis result for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub blocks: Vec<FunctionBlock>,
    /// Scan warnings followed by synthesis warnings.
    pub warnings: Vec<Warning>,
    write_aliases: bool,
}

impl GeneratedUnit {
    /// Assembles the complete Go source file.
    pub fn to_source(&self) -> String {
        let mut out = format!("package {}\n\n", self.package);

        if !self.imports.is_empty() {
            out.push_str("import (\n");
            for import in &self.imports {
                out.push('\t');
                if self.write_aliases
                    && let Some(alias) = &import.alias
                {
                    out.push_str(alias);
                    out.push(' ');
                }
                out.push_str(&import.path);
                out.push('\n');
            }
            out.push_str(")\n\n");
        }

        for block in &self.blocks {
            out.push_str(&block.text);
            out.push('\n');
        }

        out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.to_source().into_bytes()
    }

    /// Blocks generated for one type, in emission order.
    pub fn blocks_for<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a FunctionBlock> {
        self.blocks.iter().filter(move |block| block.owner == owner)
    }
}

/// Generates builder code for every annotated type in `unit`.
///
/// Types are emitted in declaration order. Within a type the constructor comes
/// first, then one group per struct member in declaration order: a field option
/// for a named field, the metadata options for a qualifying embedded relation.
///
/// ## Errors
/// Returns `BuilderGenError::Generation` when `unit` has no annotated types.
pub fn synthesize(
    unit: &SourceUnit,
    conventions: &Conventions,
) -> Result<GeneratedUnit, BuilderGenError> {
    if unit.types.is_empty() {
        return Err(BuilderGenError::Generation(format!(
            "package `{}` has no annotated struct types",
            unit.package
        )));
    }

    let mut blocks = Vec::new();
    let mut warnings = unit.warnings.clone();

    for ty in &unit.types {
        blocks.extend(type_blocks(ty, conventions, &mut warnings)?);
    }

    let mut seen = HashSet::new();
    for block in &blocks {
        if !seen.insert(block.name.as_str()) {
            warnings.push(Warning::DuplicateFunction {
                name: block.name.clone(),
                type_name: block.owner.clone(),
            });
        }
    }

    let mut generated = GeneratedUnit {
        package: unit.package.clone(),
        imports: unit.imports.clone(),
        blocks,
        warnings,
        write_aliases: conventions.preserve_import_aliases,
    };

    if let Some(warning) = validate_source(&generated.to_source())? {
        generated.warnings.push(warning);
    }

    Ok(generated)
}

fn type_blocks(
    ty: &AnnotatedType,
    conventions: &Conventions,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<FunctionBlock>, BuilderGenError> {
    let mut blocks = vec![generate_constructor(&ty.name, conventions).map_err(format_failure)?];

    for member in &ty.members {
        match member {
            Member::Field(field) => {
                if let Some(shape) = field.ty.unsupported_shape() {
                    warnings.push(Warning::UnsupportedType {
                        type_name: ty.name.clone(),
                        field: field.name.clone(),
                        shape: shape.to_string(),
                    });
                }
                blocks.push(
                    generate_field_option(&ty.name, field, conventions).map_err(format_failure)?,
                );
            }
            Member::Embedded(relation) => {
                embedded_blocks(&ty.name, relation, conventions, &mut blocks, warnings)?;
            }
        }
    }

    Ok(blocks)
}

fn embedded_blocks(
    owner: &str,
    relation: &EmbeddedRelation,
    conventions: &Conventions,
    blocks: &mut Vec<FunctionBlock>,
    warnings: &mut Vec<Warning>,
) -> Result<(), BuilderGenError> {
    if relation.is_qualified() && relation.name == conventions.object_meta {
        blocks.extend(generate_object_meta_options(owner, conventions).map_err(format_failure)?);
    } else if !(relation.is_qualified() && relation.name == conventions.type_meta_field) {
        // a qualified TypeMeta is filled in by the constructor
        warnings.push(Warning::SkippedEmbedded {
            type_name: owner.to_string(),
            relation: relation.name.clone(),
        });
    }

    Ok(())
}

fn format_failure(_: std::fmt::Error) -> BuilderGenError {
    BuilderGenError::Generation("failed to format generated code".to_string())
}

/// Re-parses generated Go source and reports the first syntax error as a warning.
///
/// ## Errors
/// Returns an error only when the Go grammar cannot be loaded.
pub fn validate_source(source: &str) -> Result<Option<Warning>, BuilderGenError> {
    let tree = parse_go(source)?;
    Ok(first_syntax_error(tree.root_node()).map(|node| {
        let position = node.start_position();
        Warning::MalformedOutput {
            line: position.row + 1,
            column: position.column + 1,
        }
    }))
}

/// Writes content to a file atomically using a unique temp file + rename.
///
/// The temp file lives next to `path`, so concurrent writers never share one.
///
/// ## Errors
/// Returns `BuilderGenError::Write` if the parent directory cannot be created,
/// the temp file cannot be written or persisting it fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BuilderGenError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_failure = |source| BuilderGenError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(parent).map_err(|source| BuilderGenError::Write {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_failure)?;
    temp_file.write_all(content).map_err(write_failure)?;
    temp_file
        .persist(path)
        .map_err(|err| write_failure(err.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::BlockKind;
    use crate::model::{EmbeddedRelation, TypeExpr};
    use tempfile::TempDir;

    fn unit(types: Vec<AnnotatedType>) -> SourceUnit {
        SourceUnit {
            package: "v1alpha1".to_string(),
            imports: vec![ImportSpec::aliased(
                "metav1",
                "\"k8s.io/apimachinery/pkg/apis/meta/v1\"",
            )],
            types,
            warnings: Vec::new(),
        }
    }

    fn object_meta() -> EmbeddedRelation {
        EmbeddedRelation::from_type(TypeExpr::qualified("metav1", "ObjectMeta"), false)
    }

    #[test]
    fn empty_unit_is_a_generation_error() {
        let err = synthesize(&unit(Vec::new()), &Conventions::default()).unwrap_err();
        assert!(matches!(err, BuilderGenError::Generation(_)));
    }

    #[test]
    fn emits_members_in_declaration_order() {
        let pod = AnnotatedType::new("Pod")
            .with_embedded(object_meta())
            .with_field("ServiceAccountName", TypeExpr::ident("string"))
            .with_field("Priority", TypeExpr::pointer(TypeExpr::ident("int32")));

        let generated = synthesize(&unit(vec![pod]), &Conventions::default()).unwrap();
        let kinds: Vec<_> = generated.blocks.iter().map(|block| block.kind).collect();

        assert_eq!(kinds[0], BlockKind::Constructor);
        assert!(kinds[1..8].iter().all(|kind| *kind == BlockKind::MetadataOption));
        assert_eq!(&kinds[8..], &[BlockKind::FieldOption, BlockKind::FieldOption]);
        assert_eq!(generated.blocks[1].name, "WithName");
        assert_eq!(generated.blocks[8].name, "WithServiceAccountName");
        assert_eq!(generated.blocks[9].name, "WithPriority");
        assert!(generated.warnings.is_empty(), "{:?}", generated.warnings);
    }

    #[test]
    fn metadata_options_follow_a_late_embed() {
        let pod = AnnotatedType::new("Pod")
            .with_field("ServiceAccountName", TypeExpr::ident("string"))
            .with_embedded(object_meta());

        let generated = synthesize(&unit(vec![pod]), &Conventions::default()).unwrap();
        let names: Vec<_> = generated.blocks.iter().map(|block| block.name.as_str()).collect();
        assert_eq!(&names[..3], &["NewPod", "WithServiceAccountName", "WithName"]);
        assert_eq!(names.last(), Some(&"WithDeletionTimestamp"));
    }

    #[test]
    fn header_and_imports_are_written_verbatim() {
        let spec = AnnotatedType::new("PodSpec")
            .with_field("RestartPolicy", TypeExpr::ident("RestartPolicy"));
        let generated = synthesize(&unit(vec![spec]), &Conventions::default()).unwrap();
        let source = generated.to_source();

        assert!(source.starts_with(
            "package v1alpha1\n\nimport (\n\t\"k8s.io/apimachinery/pkg/apis/meta/v1\"\n)\n\n\
             // NewPodSpec"
        ));
        assert!(source.ends_with("}\n\n"));
    }

    #[test]
    fn aliases_are_written_when_configured() {
        let conventions = Conventions {
            preserve_import_aliases: true,
            ..Conventions::default()
        };
        let generated =
            synthesize(&unit(vec![AnnotatedType::new("PodSpec")]), &conventions).unwrap();
        assert!(
            generated
                .to_source()
                .contains("\tmetav1 \"k8s.io/apimachinery/pkg/apis/meta/v1\"\n")
        );
    }

    #[test]
    fn no_import_block_without_imports() {
        let mut source_unit = unit(vec![AnnotatedType::new("PodSpec")]);
        source_unit.imports.clear();
        let source = synthesize(&source_unit, &Conventions::default())
            .unwrap()
            .to_source();
        assert!(source.starts_with("package v1alpha1\n\n// NewPodSpec"));
        assert!(!source.contains("import"));
    }

    #[test]
    fn other_embedded_relations_are_reported_not_generated() {
        let pod = AnnotatedType::new("Pod")
            .with_embedded(EmbeddedRelation::from_type(
                TypeExpr::qualified("metav1", "TypeMeta"),
                false,
            ))
            .with_embedded(EmbeddedRelation::from_type(
                TypeExpr::qualified("metav1", "ListMeta"),
                false,
            ))
            .with_embedded(EmbeddedRelation::from_type(
                TypeExpr::qualified("metav1", "ObjectMeta"),
                true,
            ));
        let generated = synthesize(&unit(vec![pod]), &Conventions::default()).unwrap();

        assert_eq!(generated.blocks.len(), 1);
        assert_eq!(
            generated.warnings,
            vec![
                Warning::SkippedEmbedded {
                    type_name: "Pod".to_string(),
                    relation: "ListMeta".to_string(),
                },
                Warning::SkippedEmbedded {
                    type_name: "Pod".to_string(),
                    relation: "ObjectMeta".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unsupported_types_warn_and_mark_the_output() {
        let spec = AnnotatedType::new("PodSpec")
            .with_field("Hook", TypeExpr::unsupported("function_type"))
            .with_field("Replicas", TypeExpr::ident("int32"));
        let generated = synthesize(&unit(vec![spec]), &Conventions::default()).unwrap();

        assert_eq!(generated.blocks.len(), 3);
        assert!(
            generated.blocks[1]
                .text
                .contains("func WithHook(hook unsupported-function_type) func(*PodSpec) {")
        );
        assert_eq!(generated.warnings[0].kind(), "unsupported_type");
        assert!(
            generated
                .warnings
                .iter()
                .any(|warning| warning.kind() == "malformed_output")
        );
    }

    #[test]
    fn repeated_function_names_are_reported() {
        let pod = AnnotatedType::new("Pod").with_embedded(object_meta());
        let node = AnnotatedType::new("Node").with_embedded(object_meta());
        let generated = synthesize(&unit(vec![pod, node]), &Conventions::default()).unwrap();

        let duplicates: Vec<_> = generated
            .warnings
            .iter()
            .filter_map(|warning| match warning {
                Warning::DuplicateFunction { name, type_name } => {
                    Some((name.as_str(), type_name.as_str()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(duplicates.len(), 7);
        assert_eq!(duplicates[0], ("WithName", "Node"));
    }

    #[test]
    fn well_formed_output_reparses_cleanly() {
        let pod = AnnotatedType::new("Pod")
            .with_embedded(object_meta())
            .with_field(
                "Volumes",
                TypeExpr::slice(TypeExpr::qualified("corev1", "Volume")),
            );
        let generated = synthesize(&unit(vec![pod]), &Conventions::default()).unwrap();
        assert_eq!(validate_source(&generated.to_source()).unwrap(), None);
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pod_types_builder.go");

        write_atomic(&path, b"package v1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "package v1\n");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn concurrent_writes_to_one_path_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types_builder.go");
        let target = path.as_path();

        std::thread::scope(|scope| {
            let writers: Vec<_> = ["package a\n", "package b\n"]
                .into_iter()
                .map(|content| scope.spawn(move || write_atomic(target, content.as_bytes())))
                .collect();
            for writer in writers {
                writer.join().unwrap().unwrap();
            }
        });

        let written = fs::read_to_string(&path).unwrap();
        assert!(written == "package a\n" || written == "package b\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
