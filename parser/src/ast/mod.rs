/*! Abstract Syntax Tree (AST) for byte patterns.

The AST is a tree of [`Node`]s. Each node kind is a variant of the [`Node`]
enum carrying exactly the data that kind needs. Leaves denote sets of byte
values (a byte, a bitmask, a string, etc.), while parent nodes either denote
sets too ([`Node::Range`], [`Node::Set`]) or combine their children into
larger patterns ([`Node::Sequence`], [`Node::Alternatives`] and the
quantifiers).

# Example

```
use bytepat_parser::Parser;
use bytepat_parser::ast::{Node, NodeKind};

let ast = Parser::new().parse("01 ^02 'ab'+").unwrap();

assert_eq!(ast.kind(), NodeKind::Sequence);
assert_eq!(ast.children().len(), 3);
assert_eq!(ast.children()[1], &Node::Byte { value: 0x02, inverted: true });
```
*/

use std::fmt;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use thiserror::Error;

#[cfg(feature = "ascii-tree")]
mod ascii_tree;

#[cfg(test)]
mod tests;

/// A node in the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single byte (e.g. `4d`). When inverted it matches the other 255.
    Byte { value: u8, inverted: bool },

    /// A bitmask matching every byte that has all the bits in `mask` set
    /// (e.g. `&0f`).
    AllBitmask { mask: u8, inverted: bool },

    /// A bitmask matching every byte that has at least one of the bits in
    /// `mask` set (e.g. `~81`).
    AnyBitmask { mask: u8, inverted: bool },

    /// Any byte (`.`).
    Any,

    /// A case-sensitive string (e.g. `'MZ'`). Each character is a byte,
    /// strings can only contain characters in the range U+0000-U+00FF.
    String(String),

    /// A case-insensitive string (e.g. `` `mz` ``). ASCII letters match
    /// both their upper and lower case versions.
    CaseInsensitiveString(String),

    /// An inclusive range of bytes (e.g. `00-1f` or `'a'-'z'`).
    ///
    /// Both bounds are [`Node::Byte`] or single-character [`Node::String`]
    /// nodes. The bounds can appear in any order.
    Range {
        start: Box<Node>,
        end: Box<Node>,
        inverted: bool,
    },

    /// A set of values (e.g. `[01 03-05 &80]`). Members can be any node
    /// that denotes a set of bytes, including other sets.
    Set { members: Vec<Node>, inverted: bool },

    /// Two or more nodes that must match one after the other.
    Sequence(Vec<Node>),

    /// Two or more nodes where any of them must match (e.g. `01|02`).
    Alternatives(Vec<Node>),

    /// A node that can match zero or more times (e.g. `01*`).
    ZeroToMany(Box<Node>),

    /// A node that can match one or more times (e.g. `01+`).
    OneToMany(Box<Node>),

    /// A node that can match zero or one times (e.g. `01?`).
    Optional(Box<Node>),

    /// A node that must match exactly `count` times (e.g. `01{3}`).
    Repeat { count: u32, node: Box<Node> },

    /// A node that must match at least `min` times (e.g. `01{3,*}`).
    RepeatMinToMany { min: u32, node: Box<Node> },

    /// A node that must match between `min` and `max` times, both
    /// inclusive (e.g. `01{3,5}`).
    RepeatMinToMax { min: u32, max: u32, node: Box<Node> },
}

/// Kind of [`Node`], without any associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Byte,
    AllBitmask,
    AnyBitmask,
    Any,
    String,
    CaseInsensitiveString,
    Range,
    Set,
    Sequence,
    Alternatives,
    ZeroToMany,
    OneToMany,
    Optional,
    Repeat,
    RepeatMinToMany,
    RepeatMinToMax,
}

impl NodeKind {
    /// Returns true for kinds that denote a set of byte values.
    pub fn is_byte_set(&self) -> bool {
        matches!(
            self,
            NodeKind::Byte
                | NodeKind::AllBitmask
                | NodeKind::AnyBitmask
                | NodeKind::Any
                | NodeKind::String
                | NodeKind::CaseInsensitiveString
                | NodeKind::Range
                | NodeKind::Set
        )
    }

    /// Returns true for kinds that can be inverted with `^`.
    pub fn is_invertible(&self) -> bool {
        matches!(
            self,
            NodeKind::Byte
                | NodeKind::AllBitmask
                | NodeKind::AnyBitmask
                | NodeKind::Range
                | NodeKind::Set
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Byte => "BYTE",
            NodeKind::AllBitmask => "ALL_BITMASK",
            NodeKind::AnyBitmask => "ANY_BITMASK",
            NodeKind::Any => "ANY",
            NodeKind::String => "STRING",
            NodeKind::CaseInsensitiveString => "CASE_INSENSITIVE_STRING",
            NodeKind::Range => "RANGE",
            NodeKind::Set => "SET",
            NodeKind::Sequence => "SEQUENCE",
            NodeKind::Alternatives => "ALTERNATIVES",
            NodeKind::ZeroToMany => "ZERO_TO_MANY",
            NodeKind::OneToMany => "ONE_TO_MANY",
            NodeKind::Optional => "OPTIONAL",
            NodeKind::Repeat => "REPEAT",
            NodeKind::RepeatMinToMany => "REPEAT_MIN_TO_MANY",
            NodeKind::RepeatMinToMax => "REPEAT_MIN_TO_MAX",
        };
        f.write_str(name)
    }
}

/// Error returned when some operation is applied to a [`Node`] of a kind
/// that doesn't support it.
///
/// For instance, asking for the byte value of a [`Node::Sequence`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{operation} is not supported by {kind} nodes")]
pub struct TypeError {
    /// Name of the operation that failed.
    pub operation: &'static str,
    /// Kind of the node the operation was applied to.
    pub kind: NodeKind,
}

impl TypeError {
    pub fn new(operation: &'static str, kind: NodeKind) -> Self {
        Self { operation, kind }
    }
}

impl Node {
    /// Returns the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Byte { .. } => NodeKind::Byte,
            Node::AllBitmask { .. } => NodeKind::AllBitmask,
            Node::AnyBitmask { .. } => NodeKind::AnyBitmask,
            Node::Any => NodeKind::Any,
            Node::String(_) => NodeKind::String,
            Node::CaseInsensitiveString(_) => NodeKind::CaseInsensitiveString,
            Node::Range { .. } => NodeKind::Range,
            Node::Set { .. } => NodeKind::Set,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Alternatives(_) => NodeKind::Alternatives,
            Node::ZeroToMany(_) => NodeKind::ZeroToMany,
            Node::OneToMany(_) => NodeKind::OneToMany,
            Node::Optional(_) => NodeKind::Optional,
            Node::Repeat { .. } => NodeKind::Repeat,
            Node::RepeatMinToMany { .. } => NodeKind::RepeatMinToMany,
            Node::RepeatMinToMax { .. } => NodeKind::RepeatMinToMax,
        }
    }

    /// Returns true if the node is inverted.
    ///
    /// Only nodes whose kind is invertible can return true.
    pub fn is_inverted(&self) -> bool {
        match self {
            Node::Byte { inverted, .. }
            | Node::AllBitmask { inverted, .. }
            | Node::AnyBitmask { inverted, .. }
            | Node::Range { inverted, .. }
            | Node::Set { inverted, .. } => *inverted,
            _ => false,
        }
    }

    /// Returns the same node with its inversion flag toggled.
    ///
    /// Fails with [`TypeError`] if the node's kind can't be inverted.
    pub fn invert(mut self) -> Result<Self, TypeError> {
        if !self.kind().is_invertible() {
            return Err(TypeError::new("inversion", self.kind()));
        }
        if let Node::Byte { inverted, .. }
        | Node::AllBitmask { inverted, .. }
        | Node::AnyBitmask { inverted, .. }
        | Node::Range { inverted, .. }
        | Node::Set { inverted, .. } = &mut self
        {
            *inverted = !*inverted;
        }
        Ok(self)
    }

    /// Returns the value of a [`Node::Byte`], or the mask of a bitmask.
    pub fn byte_value(&self) -> Result<u8, TypeError> {
        match self {
            Node::Byte { value, .. } => Ok(*value),
            Node::AllBitmask { mask, .. } | Node::AnyBitmask { mask, .. } => {
                Ok(*mask)
            }
            _ => Err(TypeError::new("byte value", self.kind())),
        }
    }

    /// Returns the text of a [`Node::String`] or
    /// [`Node::CaseInsensitiveString`].
    pub fn text_value(&self) -> Result<&str, TypeError> {
        match self {
            Node::String(s) | Node::CaseInsensitiveString(s) => Ok(s),
            _ => Err(TypeError::new("text value", self.kind())),
        }
    }

    /// Returns the minimum and maximum number of repetitions of a
    /// quantifier. The maximum is `None` when unbounded.
    pub fn repeat_bounds(&self) -> Result<(u32, Option<u32>), TypeError> {
        match self {
            Node::ZeroToMany(_) => Ok((0, None)),
            Node::OneToMany(_) => Ok((1, None)),
            Node::Optional(_) => Ok((0, Some(1))),
            Node::Repeat { count, .. } => Ok((*count, Some(*count))),
            Node::RepeatMinToMany { min, .. } => Ok((*min, None)),
            Node::RepeatMinToMax { min, max, .. } => Ok((*min, Some(*max))),
            _ => Err(TypeError::new("repeat bounds", self.kind())),
        }
    }

    /// Returns the children of this node, in order. Leaves have no
    /// children.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Byte { .. }
            | Node::AllBitmask { .. }
            | Node::AnyBitmask { .. }
            | Node::Any
            | Node::String(_)
            | Node::CaseInsensitiveString(_) => vec![],
            Node::Range { start, end, .. } => vec![&**start, &**end],
            Node::Set { members: nodes, .. }
            | Node::Sequence(nodes)
            | Node::Alternatives(nodes) => nodes.iter().collect(),
            Node::ZeroToMany(node)
            | Node::OneToMany(node)
            | Node::Optional(node)
            | Node::Repeat { node, .. }
            | Node::RepeatMinToMany { node, .. }
            | Node::RepeatMinToMax { node, .. } => vec![&**node],
        }
    }

    /// Returns true if the node matches exactly one byte, which means that
    /// it can be represented by a single set of byte values.
    pub fn is_single_position(&self) -> bool {
        match self {
            Node::String(s) | Node::CaseInsensitiveString(s) => {
                s.chars().count() == 1
            }
            _ => self.kind().is_byte_set(),
        }
    }
}

/// Writes the node back in pattern syntax.
///
/// The output is canonical: bytes are written as lower-case hex digits,
/// members of sequences and sets are separated by a single space, and
/// parenthesis are added only where required.
///
/// Parsing the output of a node produced by [`crate::Parser`] produces a
/// node equal to the original one. Nodes the parser never produces, like
/// repetitions with a zero count, are printed in the same syntax and the
/// parser rejects the result.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let caret = if self.is_inverted() { "^" } else { "" };
        match self {
            Node::Byte { value, .. } => write!(f, "{caret}{value:02x}"),
            Node::AllBitmask { mask, .. } => write!(f, "{caret}&{mask:02x}"),
            Node::AnyBitmask { mask, .. } => write!(f, "{caret}~{mask:02x}"),
            Node::Any => write!(f, "."),
            Node::String(s) => write!(f, "'{s}'"),
            Node::CaseInsensitiveString(s) => write!(f, "`{s}`"),
            Node::Range { start, end, .. } => {
                write!(f, "{caret}{start}-{end}")
            }
            Node::Set { members, .. } => {
                write!(f, "{caret}[{}]", members.iter().join(" "))
            }
            Node::Sequence(nodes) => {
                let items = nodes.iter().map(|node| match node {
                    Node::Sequence(_) | Node::Alternatives(_) => {
                        format!("({node})")
                    }
                    _ => node.to_string(),
                });
                write!(f, "{}", items.format(" "))
            }
            Node::Alternatives(nodes) => {
                let items = nodes.iter().map(|node| match node {
                    Node::Alternatives(_) => format!("({node})"),
                    _ => node.to_string(),
                });
                write!(f, "{}", items.format("|"))
            }
            Node::ZeroToMany(node) => write_quantified(f, node, "*"),
            Node::OneToMany(node) => write_quantified(f, node, "+"),
            Node::Optional(node) => write_quantified(f, node, "?"),
            Node::Repeat { count, node } => {
                write_quantified(f, node, &format!("{{{count}}}"))
            }
            Node::RepeatMinToMany { min, node } => {
                write_quantified(f, node, &format!("{{{min},*}}"))
            }
            Node::RepeatMinToMax { min, max, node } => {
                write_quantified(f, node, &format!("{{{min},{max}}}"))
            }
        }
    }
}

fn write_quantified(
    f: &mut Formatter<'_>,
    node: &Node,
    quantifier: &str,
) -> fmt::Result {
    // A quantifier applies to the atom immediately before it, anything
    // that is not an atom must be enclosed in parenthesis.
    match node {
        Node::Sequence(_)
        | Node::Alternatives(_)
        | Node::ZeroToMany(_)
        | Node::OneToMany(_)
        | Node::Optional(_)
        | Node::Repeat { .. }
        | Node::RepeatMinToMany { .. }
        | Node::RepeatMinToMax { .. } => write!(f, "({node}){quantifier}"),
        _ => write!(f, "{node}{quantifier}"),
    }
}
