//! Simplifications applied to the AST before building the automaton.

use bytepat_parser::ast::Node;

use crate::resolver::{resolve, Inversion};

/// Returns an equivalent AST that produces a smaller automaton.
///
/// Alternatives where every alternative matches exactly one byte are
/// replaced with a set that contains all the alternatives. `01|02|7f`
/// becomes `[01 02 7f]`, which needs two states instead of four.
///
/// Alternatives that don't match any byte, like `^[00-ff]`, are never
/// folded, so the optimized AST fails to compile whenever the original
/// one does.
pub(crate) fn optimize(node: Node) -> Node {
    match node {
        Node::Alternatives(nodes) => {
            let nodes: Vec<Node> = nodes.into_iter().map(optimize).collect();
            if nodes.iter().all(|node| {
                node.is_single_position() && matches_some_byte(node)
            }) {
                Node::Set { members: nodes, inverted: false }
            } else {
                Node::Alternatives(nodes)
            }
        }
        Node::Sequence(nodes) => {
            Node::Sequence(nodes.into_iter().map(optimize).collect())
        }
        Node::ZeroToMany(node) => Node::ZeroToMany(Box::new(optimize(*node))),
        Node::OneToMany(node) => Node::OneToMany(Box::new(optimize(*node))),
        Node::Optional(node) => Node::Optional(Box::new(optimize(*node))),
        Node::Repeat { count, node } => {
            Node::Repeat { count, node: Box::new(optimize(*node)) }
        }
        Node::RepeatMinToMany { min, node } => {
            Node::RepeatMinToMany { min, node: Box::new(optimize(*node)) }
        }
        Node::RepeatMinToMax { min, max, node } => Node::RepeatMinToMax {
            min,
            max,
            node: Box::new(optimize(*node)),
        },
        node => node,
    }
}

fn matches_some_byte(node: &Node) -> bool {
    resolve(node, Inversion::Effective).is_ok_and(|set| !set.is_empty())
}
