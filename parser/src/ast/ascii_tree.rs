/*! Functions that return an ASCII representation of byte pattern ASTs. */

use ::ascii_tree::Tree;
use ::ascii_tree::Tree::Leaf;

use crate::ast::Node;

/// Returns a representation of the node and its descendants as an ASCII
/// tree.
pub(crate) fn node_ascii_tree(node: &Node) -> Tree {
    let caret = if node.is_inverted() { "^" } else { "" };
    let kind = node.kind();

    let label = match node {
        Node::Byte { value, .. } => format!("{caret}{kind} {value:#04x}"),
        Node::AllBitmask { mask, .. } | Node::AnyBitmask { mask, .. } => {
            format!("{caret}{kind} {mask:#04x}")
        }
        Node::String(s) | Node::CaseInsensitiveString(s) => {
            format!("{kind} {s:?}")
        }
        Node::Repeat { .. }
        | Node::RepeatMinToMany { .. }
        | Node::RepeatMinToMax { .. } => match node.repeat_bounds() {
            Ok((min, Some(max))) if min == max => format!("{kind} {min}"),
            Ok((min, Some(max))) => format!("{kind} {min}..={max}"),
            Ok((min, None)) => format!("{kind} {min}.."),
            Err(_) => unreachable!(),
        },
        _ => format!("{caret}{kind}"),
    };

    let children = node.children();

    if children.is_empty() {
        Leaf(vec![label])
    } else {
        Tree::Node(label, children.into_iter().map(node_ascii_tree).collect())
    }
}

impl Node {
    /// Returns the node and its descendants as an ASCII tree.
    pub fn ascii_tree(&self) -> Tree {
        node_ascii_tree(self)
    }

    /// Returns a String with an ASCII tree that represents the node and its
    /// descendants.
    pub fn ascii_tree_string(&self) -> String {
        let mut buf = String::new();
        // Writing into a String never fails.
        let _ = ::ascii_tree::write_tree(&mut buf, &self.ascii_tree());
        buf
    }
}
