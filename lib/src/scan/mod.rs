//! Annotation scanning: Go source text in, [`SourceUnit`] out.
//!
//! The scanner parses a file with tree-sitter-go and keeps only what the
//! synthesizer needs:
//!
//! - the package name
//! - every import spec, in order and unfiltered
//! - the struct types whose declaration documentation carries the builder marker
//!
//! Selection is declaration-level. For a grouped `type ( ... )` block the
//! comment above `type` decides for every spec inside it; a marker on an inner
//! spec's own comment has no effect.

mod comments;
mod types;

use tree_sitter::{Node, Parser, Tree};

use crate::conventions::Conventions;
use crate::diagnostics::Warning;
use crate::error::BuilderGenError;
use crate::model::{AnnotatedType, EmbeddedRelation, Field, ImportSpec, Member, SourceUnit};

/// Scans Go source with the default conventions.
///
/// ## Errors
/// Returns `BuilderGenError::Parse` when the source is not valid Go.
pub fn scan(source: &str) -> Result<SourceUnit, BuilderGenError> {
    scan_with(source, &Conventions::default())
}

/// Scans Go source, selecting declarations with `conventions.marker`.
///
/// ## Returns
/// A `SourceUnit` whose `types` is empty when nothing in the file was marked.
///
/// ## Errors
/// Returns `BuilderGenError::Parse` when the source is not valid Go or has no
/// package clause.
pub fn scan_with(source: &str, conventions: &Conventions) -> Result<SourceUnit, BuilderGenError> {
    let tree = parse_go(source)?;
    let root = tree.root_node();

    if let Some(node) = first_syntax_error(root) {
        return Err(parse_error(node, source));
    }

    let bytes = source.as_bytes();
    let mut unit = SourceUnit {
        package: String::new(),
        imports: Vec::new(),
        types: Vec::new(),
        warnings: Vec::new(),
    };

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "package_clause" => {
                if let Some(name) = find_named_child(node, "package_identifier") {
                    unit.package = node_text(name, bytes);
                }
            }
            "import_declaration" => collect_imports(node, bytes, &mut unit.imports),
            "type_declaration" => scan_type_declaration(node, bytes, conventions, &mut unit),
            _ => {}
        }
    }

    if unit.package.is_empty() {
        return Err(BuilderGenError::Parse {
            line: 1,
            column: 1,
            message: "missing package clause".to_string(),
        });
    }

    tracing::debug!(
        package = %unit.package,
        imports = unit.imports.len(),
        types = unit.types.len(),
        "Scanned source"
    );

    Ok(unit)
}

/// Parses Go source into a tree-sitter tree.
pub(crate) fn parse_go(source: &str) -> Result<Tree, BuilderGenError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| BuilderGenError::Grammar)?;

    parser.parse(source, None).ok_or_else(|| BuilderGenError::Parse {
        line: 1,
        column: 1,
        message: "parser produced no tree".to_string(),
    })
}

/// Finds the first error or missing node in document order.
pub(crate) fn first_syntax_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_syntax_error);
    // has_error() can be set without a reachable error child
    found.or(Some(node))
}

fn parse_error(node: Node<'_>, source: &str) -> BuilderGenError {
    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = node_text(node, source.as_bytes())
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(24)
            .collect();
        format!("unexpected `{snippet}`")
    };

    BuilderGenError::Parse {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

fn collect_imports(node: Node<'_>, source: &[u8], imports: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => imports.extend(import_spec(child, source)),
            "import_spec_list" => {
                let mut list_cursor = child.walk();
                imports.extend(
                    child
                        .named_children(&mut list_cursor)
                        .filter(|spec| spec.kind() == "import_spec")
                        .filter_map(|spec| import_spec(spec, source)),
                );
            }
            _ => {}
        }
    }
}

fn import_spec(node: Node<'_>, source: &[u8]) -> Option<ImportSpec> {
    let path = node_text(node.child_by_field_name("path")?, source);
    let alias = node
        .child_by_field_name("name")
        .map(|name| node_text(name, source));

    Some(ImportSpec { path, alias })
}

fn scan_type_declaration(
    node: Node<'_>,
    source: &[u8],
    conventions: &Conventions,
    unit: &mut SourceUnit,
) {
    let marked = comments::leading_doc(node, source)
        .is_some_and(|doc| doc.contains(conventions.marker.as_str()));
    if !marked {
        return;
    }

    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        match spec.kind() {
            "type_spec" => {
                let selected = annotated_struct(spec, source, conventions, &mut unit.warnings);
                if let Some(ty) = selected {
                    let name = ty.name.clone();
                    tracing::debug!(type_name = %name, "Selected annotated struct");
                    if unit.register(ty) {
                        unit.warnings
                            .push(Warning::ShadowedDeclaration { type_name: name });
                    }
                }
            }
            "type_alias" => {
                let alias = spec
                    .child_by_field_name("name")
                    .map(|name| node_text(name, source))
                    .unwrap_or_default();
                tracing::debug!(alias = %alias, "Ignoring annotated type alias");
            }
            _ => {}
        }
    }
}

/// Builds an [`AnnotatedType`] from a `type_spec`, or `None` for non-struct and
/// generic specs.
fn annotated_struct(
    spec: Node<'_>,
    source: &[u8],
    conventions: &Conventions,
    warnings: &mut Vec<Warning>,
) -> Option<AnnotatedType> {
    let name = node_text(spec.child_by_field_name("name")?, source);
    let body = spec.child_by_field_name("type")?;

    if body.kind() != "struct_type" {
        tracing::debug!(
            type_name = %name,
            kind = body.kind(),
            "Ignoring annotated non-struct type"
        );
        return None;
    }
    if spec.child_by_field_name("type_parameters").is_some() {
        warnings.push(Warning::SkippedGeneric { type_name: name });
        return None;
    }

    let mut annotated = AnnotatedType::new(name);
    let Some(list) = find_named_child(body, "field_declaration_list") else {
        return Some(annotated);
    };

    let mut cursor = list.walk();
    for field in list
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "field_declaration")
    {
        let Some(ty_node) = field.child_by_field_name("type") else {
            continue;
        };
        let ty = types::type_expr(ty_node, source);

        let mut name_cursor = field.walk();
        let names: Vec<String> = field
            .children_by_field_name("name", &mut name_cursor)
            .map(|name| node_text(name, source))
            .collect();

        if names.is_empty() {
            let pointer = has_child_kind(field, "*");
            annotated
                .members
                .push(Member::Embedded(EmbeddedRelation::from_type(ty, pointer)));
            continue;
        }

        if comments::carries_marker(field, source, &conventions.field_skip_marker) {
            tracing::debug!(
                type_name = %annotated.name,
                fields = ?names,
                "Skipping fields marked with the field skip marker"
            );
            continue;
        }

        annotated
            .members
            .extend(names.into_iter().map(|name| {
                Member::Field(Field {
                    name,
                    ty: ty.clone(),
                })
            }));
    }

    Some(annotated)
}

fn find_named_child<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == kind)
}

pub(crate) fn node_text(node: Node<'_>, source: &[u8]) -> String {
    node.utf8_text(source)
        .map(str::to_string)
        .unwrap_or_default()
}
