//! Conversion of tree-sitter-go type nodes into [`TypeExpr`].

use tree_sitter::Node;

use super::node_text;
use crate::model::TypeExpr;

/// Converts a Go type node into a [`TypeExpr`].
///
/// Shapes outside identifier / pointer / qualified / slice / array / map are kept
/// as [`TypeExpr::Unsupported`] carrying the node kind.
pub(crate) fn type_expr(node: Node<'_>, source: &[u8]) -> TypeExpr {
    match node.kind() {
        "type_identifier" => TypeExpr::Ident(node_text(node, source)),
        "pointer_type" => match first_type_child(node) {
            Some(inner) => TypeExpr::pointer(type_expr(inner, source)),
            None => TypeExpr::unsupported("pointer_type"),
        },
        "qualified_type" => {
            match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(package), Some(name)) => {
                    TypeExpr::qualified(node_text(package, source), node_text(name, source))
                }
                _ => TypeExpr::unsupported("qualified_type"),
            }
        }
        "slice_type" => match node.child_by_field_name("element") {
            Some(element) => TypeExpr::slice(type_expr(element, source)),
            None => TypeExpr::unsupported("slice_type"),
        },
        "array_type" => {
            match (
                node.child_by_field_name("length"),
                node.child_by_field_name("element"),
            ) {
                (Some(len), Some(element)) => {
                    TypeExpr::array(node_text(len, source), type_expr(element, source))
                }
                _ => TypeExpr::unsupported("array_type"),
            }
        }
        "map_type" => {
            match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => {
                    TypeExpr::map(type_expr(key, source), type_expr(value, source))
                }
                _ => TypeExpr::unsupported("map_type"),
            }
        }
        "parenthesized_type" => match first_type_child(node) {
            Some(inner) => type_expr(inner, source),
            None => TypeExpr::unsupported("parenthesized_type"),
        },
        other => TypeExpr::unsupported(other),
    }
}

fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() != "comment")
}
