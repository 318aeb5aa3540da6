use thiserror::Error;

use bytepat_parser::ast::TypeError;
use bytepat_parser::Error as ParseError;

/// Errors returned while compiling byte patterns.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// The pattern is not syntactically or semantically valid.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Some AST node was used in a way its kind doesn't support.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A transition that doesn't match any byte. For instance, the one
    /// produced by `^[00-ff]`.
    #[error("the pattern contains a set that doesn't match any byte")]
    EmptyTransition,

    /// The automaton would exceed [`MAX_STATES`] states or
    /// [`MAX_TRANSITIONS`] transitions.
    ///
    /// [`MAX_STATES`]: crate::automaton::MAX_STATES
    /// [`MAX_TRANSITIONS`]: crate::automaton::MAX_TRANSITIONS
    #[error("the pattern is too large")]
    TooLarge,

    /// The automaton or AST received doesn't satisfy the preconditions of
    /// the operation.
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
}
