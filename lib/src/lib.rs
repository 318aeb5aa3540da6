/*! Compiles byte patterns into finite-state automata.

A byte pattern is a regular-expression-like description of a sequence of raw
bytes, like `4d 5a (90|cc) [00-1f]+`. This crate takes the pattern through
four stages:

1. The pattern is parsed into an AST by [`bytepat_parser`].
2. AST nodes that denote sets of bytes, like ranges, bitmasks or sets, are
   resolved into a [`ByteSet`] (see [`resolve`]).
3. The Glushkov construction produces a non-deterministic automaton with a
   state per position in the pattern and no empty transitions
   (see [`nfa::GlushkovBuilder`]).
4. The subset construction turns the NFA into a deterministic automaton
   (see [`dfa::compile`]).

The [`Compiler`] runs all the stages and produces a [`Matcher`].

# Example

```rust
// Compile a pattern.
let matcher = bytepat::compile("4d 5a (90|cc) [00-1f]+").unwrap();

// Match it against some data.
assert!(matcher.accepts(b"MZ\x90\x01\x02"));

// Find it within some larger data.
let m = matcher.find(b"....MZ\xcc\x00....").unwrap();
assert_eq!(m.range, 4..8);
```
*/

pub use bytepat_parser::ast::Node;

pub use automaton::PatternId;
pub use byteset::ByteSet;
pub use compiler::compile;
pub use compiler::AutomatonBuilder;
pub use compiler::Compiler;
pub use compiler::Error;
pub use compiler::PatternParser;
pub use matcher::Match;
pub use matcher::Matcher;
pub use matcher::Matches;
pub use resolver::resolve;
pub use resolver::Inversion;

pub mod automaton;
pub mod dfa;
pub mod nfa;

mod byteset;
mod compiler;
mod matcher;
mod resolver;

#[cfg(test)]
mod tests;
