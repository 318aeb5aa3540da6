/*! Parses byte pattern expressions and produces either a Concrete Syntax Tree
(CST) or an Abstract Syntax Tree (AST).

A byte pattern is a regular-expression-like description of a sequence of raw
bytes. For example, this pattern matches the byte `0x4d`, followed by either
`0x5a` or any byte with the two lowest bits set, followed by zero or more
ASCII digits:

```text
4d (5a | &03) \d*   # comments run until the end of the line
```

The CST keeps every detail of the source, including whitespace and comments,
and is mostly useful for debugging the grammar. The AST, represented by
[`ast::Node`], drops all syntactic details and is what the `bytepat` crate
compiles into automata.
*/

use std::fmt::{Display, Formatter};
use std::ops::Range;

pub use parser::*;

pub mod ast;
pub mod cst;
pub mod report;

mod parser;

/// Starting and ending positions of some piece of a pattern inside the
/// source code.
#[derive(Default, Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Span {
    start: u32,
    end: u32,
}

impl From<pest::Span<'_>> for Span {
    fn from(value: pest::Span) -> Self {
        Self::new(value.start(), value.end())
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end)
    }
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start: start as u32, end: end as u32 }
    }

    /// Offset within the source code (in bytes) were the span starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.start as usize
    }

    /// Offset within the source code (in bytes) where the span ends.
    #[inline]
    pub fn end(&self) -> usize {
        self.end as usize
    }

    /// Returns the span as a range of byte offsets.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Returns a new [`Span`] that combines this span with `other`.
    ///
    /// The resulting span goes from `self.start()` to `other.end()`.
    pub fn combine(&self, other: &Self) -> Self {
        Self { start: self.start, end: other.end }
    }
}
