/*! Computes the set of byte values denoted by an AST node.

Nodes like [`Node::Byte`], [`Node::Range`] or [`Node::Set`] denote a set of
byte values that a single position of the input must match. This module
converts those nodes into a [`ByteSet`].
*/

use bytepat_parser::ast::{Node, TypeError};

use crate::byteset::ByteSet;

/// Tells whether the inversion flag of the node being resolved is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inversion {
    /// The node's own inversion flag is ignored. Nested sets are still
    /// inverted if they were declared as such.
    AsDeclared,
    /// The node's own inversion flag is applied.
    Effective,
}

/// Returns the set of byte values denoted by `node`.
///
/// With [`Inversion::AsDeclared`] the result for `^[00-1f]` is `[00-1f]`,
/// while [`Inversion::Effective`] produces the 224 values not in that
/// range. Members of a [`Node::Set`] are always resolved with
/// [`Inversion::Effective`], so `[01 ^[01]]` denotes every byte.
///
/// Fails with [`TypeError`] if the node doesn't denote a set of bytes, or
/// if it is a range whose bounds are not single bytes.
///
/// # Example
///
/// ```
/// use bytepat::{resolve, Inversion};
/// use bytepat_parser::Parser;
///
/// let node = Parser::new().parse("^[00-1f]").unwrap();
/// assert_eq!(resolve(&node, Inversion::AsDeclared).unwrap().len(), 32);
/// assert_eq!(resolve(&node, Inversion::Effective).unwrap().len(), 224);
/// ```
pub fn resolve(node: &Node, inversion: Inversion) -> Result<ByteSet, TypeError> {
    let set = match node {
        Node::Byte { value, .. } => ByteSet::single(*value),
        Node::AllBitmask { mask, .. } => ByteSet::all_bitmask(*mask),
        Node::AnyBitmask { mask, .. } => ByteSet::any_bitmask(*mask),
        Node::Any => ByteSet::all(),
        Node::String(s) => {
            let mut set = ByteSet::empty();
            for c in s.chars() {
                set.insert(char_to_byte(node, c)?);
            }
            set
        }
        Node::CaseInsensitiveString(s) => {
            let mut set = ByteSet::empty();
            for c in s.chars() {
                let b = char_to_byte(node, c)?;
                set.insert(b.to_ascii_lowercase());
                set.insert(b.to_ascii_uppercase());
            }
            set
        }
        Node::Range { start, end, .. } => {
            ByteSet::range(range_bound(start)?, range_bound(end)?)
        }
        Node::Set { members, .. } => {
            let mut set = ByteSet::empty();
            for member in members {
                set = set.union(&resolve(member, Inversion::Effective)?);
                if set.is_full() {
                    break;
                }
            }
            set
        }
        _ => return Err(TypeError::new("byte set", node.kind())),
    };

    if inversion == Inversion::Effective && node.is_inverted() {
        Ok(set.complement())
    } else {
        Ok(set)
    }
}

fn char_to_byte(node: &Node, c: char) -> Result<u8, TypeError> {
    u8::try_from(c).map_err(|_| TypeError::new("non-byte character", node.kind()))
}

/// Returns the value of a range bound, which must be a non-inverted byte
/// or a string with a single character.
fn range_bound(node: &Node) -> Result<u8, TypeError> {
    match node {
        Node::Byte { value, inverted: false } => Ok(*value),
        Node::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => char_to_byte(node, c),
                _ => Err(TypeError::new("range bound", node.kind())),
            }
        }
        _ => Err(TypeError::new("range bound", node.kind())),
    }
}
