/*! Concrete Syntax Tree (CST) for byte patterns.

 # Example

```rust
use bytepat_parser::{Parser, GrammarRule};

let mut cst = Parser::new().build_cst("01 02 | 'MZ'").unwrap();

// The CST is an iterator that returns nodes of type CSTNode. At the top
// level the iterator returns a single node, corresponding to the grammar
// rule `pattern`, which is the grammar's top-level rule.
let root = cst.next().unwrap();
assert_eq!(root.as_rule(), GrammarRule::pattern);

// With the `into_inner` method we obtain a new CST with the children of
// the top-level node, the alternatives and the end-of-input marker.
let children: Vec<GrammarRule> =
    root.into_inner().map(|node| node.as_rule()).collect();

assert_eq!(children, vec![GrammarRule::alternatives, GrammarRule::EOI]);
```
*/

use std::fmt::Debug;

use pest::iterators::Pair;

use crate::parser::GrammarRule;

/// A node in the Concrete Syntax Tree (CST).
#[derive(Debug)]
pub struct CSTNode<'src> {
    comments: bool,
    whitespaces: bool,
    pair: Pair<'src, GrammarRule>,
}

impl<'src> CSTNode<'src> {
    /// Returns the grammar rule associated to this [`CSTNode`].
    pub fn as_rule(&self) -> GrammarRule {
        self.pair.as_rule()
    }

    /// Returns the positions within the pattern where the node starts and
    /// ends.
    pub fn as_span(&self) -> pest::Span<'src> {
        self.pair.as_span()
    }

    /// Returns the piece of the pattern that corresponds to this node.
    pub fn as_str(&self) -> &'src str {
        self.pair.as_str()
    }

    /// Returns a new [`CST`] with the children of this [`CSTNode`].
    pub fn into_inner(self) -> CST<'src> {
        let comments = self.comments;
        let whitespaces = self.whitespaces;
        CST {
            comments,
            whitespaces,
            pairs: Box::new(self.pair.into_inner().filter(move |item| {
                match item.as_rule() {
                    GrammarRule::COMMENT => comments,
                    GrammarRule::WHITESPACE => whitespaces,
                    _ => true,
                }
            })),
        }
    }

    /// Enables or disables comments while iterating the children of this
    /// [`CSTNode`]. The default value is `false`.
    pub fn comments(self, yes: bool) -> Self {
        Self { comments: yes, ..self }
    }

    /// Enables or disables whitespaces while iterating the children of this
    /// [`CSTNode`]. Newlines are whitespaces too. The default value is
    /// `false`.
    pub fn whitespaces(self, yes: bool) -> Self {
        Self { whitespaces: yes, ..self }
    }
}

impl<'src> From<Pair<'src, GrammarRule>> for CSTNode<'src> {
    fn from(pair: Pair<'src, GrammarRule>) -> Self {
        Self { whitespaces: false, comments: false, pair }
    }
}

pub trait PairsIterator<'src>:
    Iterator<Item = Pair<'src, GrammarRule>> + 'src
{
}

impl<'src, T> PairsIterator<'src> for T where
    T: Iterator<Item = Pair<'src, GrammarRule>> + 'src
{
}

/// A Concrete Syntax Tree (CST) for a byte pattern.
///
/// A CST is a tree where each node corresponds to a grammar rule in the
/// [`GrammarRule`] enum. This structure is an iterator that returns tree
/// nodes as instances of [`CSTNode`]. In turn, each [`CSTNode`] has a
/// [`CSTNode::into_inner`] method that returns a [`CST`] for iterating the
/// children of that node.
pub struct CST<'src> {
    pub(crate) comments: bool,
    pub(crate) whitespaces: bool,
    pub(crate) pairs: Box<dyn PairsIterator<'src>>,
}

impl<'src> Iterator for CST<'src> {
    type Item = CSTNode<'src>;
    fn next(&mut self) -> Option<Self::Item> {
        // Comments and whitespaces at the top level are filtered here,
        // nested ones are filtered by `CSTNode::into_inner`.
        loop {
            let pair = self.pairs.next()?;
            let keep = match pair.as_rule() {
                GrammarRule::COMMENT => self.comments,
                GrammarRule::WHITESPACE => self.whitespaces,
                _ => true,
            };
            if keep {
                return Some(CSTNode {
                    pair,
                    whitespaces: self.whitespaces,
                    comments: self.comments,
                });
            }
        }
    }
}

impl<'src> CST<'src> {
    /// Disables or enables comments in a CST.
    ///
    /// When disabled, nodes for [`GrammarRule::COMMENT`] are skipped while
    /// the tree is traversed.
    pub fn comments(self, yes: bool) -> Self {
        Self { comments: yes, ..self }
    }

    /// Disables or enables whitespaces in a CST.
    ///
    /// When disabled, nodes for [`GrammarRule::WHITESPACE`] are skipped
    /// while the tree is traversed.
    pub fn whitespaces(self, yes: bool) -> Self {
        Self { whitespaces: yes, ..self }
    }

    /// Returns an ASCII tree that represents the CST.
    #[cfg(feature = "ascii-tree")]
    pub fn ascii_tree(&mut self) -> Vec<ascii_tree::Tree> {
        let mut vec = Vec::new();
        for node in self.by_ref() {
            let grammar_rule = node.as_rule();
            if grammar_rule == GrammarRule::EOI {
                continue;
            }
            let node_content = node.as_str().trim();
            let sub_tree = node.into_inner().ascii_tree();
            let node = if sub_tree.is_empty() {
                let leaf = format!("{:?} \"{}\"", grammar_rule, node_content);
                ascii_tree::Tree::Leaf(vec![leaf])
            } else {
                ascii_tree::Tree::Node(format!("{:?}", grammar_rule), sub_tree)
            };
            vec.push(node);
        }
        vec
    }

    /// Returns a String with an ASCII tree that represents the CST.
    #[cfg(feature = "ascii-tree")]
    pub fn ascii_tree_string(&mut self) -> String {
        let mut buf = String::new();
        for tree in self.ascii_tree() {
            // Writing into a String never fails.
            let _ = ascii_tree::write_tree(&mut buf, &tree);
        }
        buf
    }
}
