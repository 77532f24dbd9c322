//! Go documentation-comment association.
//!
//! tree-sitter keeps comments as sibling nodes, so the comment group a Go
//! declaration "owns" has to be rebuilt from positions: consecutive comments with
//! no blank line between them, ending on the line right above the node (never on
//! the node's own line), and not trailing some earlier token on its own line.

use tree_sitter::Node;

use super::node_text;

/// Returns the documentation comment group directly above `node`.
pub(crate) fn leading_doc(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut prev = node.prev_named_sibling();

    while let Some(sibling) = prev {
        // each comment must end on the line directly above what follows it
        if sibling.kind() != "comment" || sibling.end_position().row + 1 != next_row {
            break;
        }
        if is_trailing(sibling) {
            break;
        }

        comments.push(node_text(sibling, source));
        next_row = sibling.start_position().row;
        prev = sibling.prev_named_sibling();
    }

    if comments.is_empty() {
        return None;
    }

    comments.reverse();
    Some(comments.join("\n"))
}

/// Returns the comment that follows `node` on its last line, if any.
pub(crate) fn trailing_comment(node: Node<'_>, source: &[u8]) -> Option<String> {
    node.next_named_sibling()
        .filter(|sibling| {
            sibling.kind() == "comment"
                && sibling.start_position().row == node.end_position().row
        })
        .map(|comment| node_text(comment, source))
}

/// True when either comment attached to `node` contains `marker`.
pub(crate) fn carries_marker(node: Node<'_>, source: &[u8], marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }

    leading_doc(node, source).is_some_and(|doc| doc.contains(marker))
        || trailing_comment(node, source).is_some_and(|comment| comment.contains(marker))
}

/// A comment that shares its first line with the token before it.
fn is_trailing(comment: Node<'_>) -> bool {
    let mut prev = comment.prev_sibling();
    while let Some(sibling) = prev {
        // statement terminators span into the next line
        if sibling.kind() == "\n" {
            prev = sibling.prev_sibling();
            continue;
        }
        return sibling.end_position().row == comment.start_position().row;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::parse_go;

    fn doc_of_first_type(source: &str) -> Option<String> {
        let tree = parse_go(source).unwrap();
        let root = tree.root_node();
        let mut cursor = root.walk();
        let decl = root
            .named_children(&mut cursor)
            .find(|node| node.kind() == "type_declaration")
            .unwrap();
        leading_doc(decl, source.as_bytes())
    }

    #[test]
    fn collects_adjacent_comment_lines_in_order() {
        let source = "package v1\n\n// Pod is a pod\n// +builder\ntype Pod struct{}\n";
        assert_eq!(
            doc_of_first_type(source).as_deref(),
            Some("// Pod is a pod\n// +builder")
        );
    }

    #[test]
    fn blank_line_breaks_the_group() {
        let source = "package v1\n\n// +builder\n\n// Pod is a pod\ntype Pod struct{}\n";
        assert_eq!(doc_of_first_type(source).as_deref(), Some("// Pod is a pod"));
    }

    #[test]
    fn detached_comment_is_not_documentation() {
        let source = "package v1\n\n// +builder\n\ntype Pod struct{}\n";
        assert_eq!(doc_of_first_type(source), None);
    }

    #[test]
    fn comment_on_the_declaration_line_is_not_documentation() {
        let source = "package v1\n\n/* +builder */ type Pod struct{}\n";
        assert_eq!(doc_of_first_type(source), None);

        let source = "package v1\n\n// Pod is a pod\n/* +builder */ type Pod struct{}\n";
        assert_eq!(doc_of_first_type(source), None);
    }

    #[test]
    fn multi_line_block_comment_above_is_documentation() {
        let source = "package v1\n\n/*\n +builder\n*/\ntype Pod struct{}\n";
        assert_eq!(
            doc_of_first_type(source).as_deref(),
            Some("/*\n +builder\n*/")
        );
    }

    #[test]
    fn trailing_comment_of_previous_statement_is_excluded() {
        let source = "package v1\n\nvar x int // +builder\ntype Pod struct{}\n";
        assert_eq!(doc_of_first_type(source), None);
    }
}
