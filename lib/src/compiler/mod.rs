/*! Compiles byte patterns into automata.

The [`Compiler`] drives the whole pipeline: the pattern is parsed into an
AST, the AST is optionally simplified, the Glushkov construction produces
an NFA and, unless told otherwise, the NFA is converted into a DFA. The
result is a [`Matcher`] that can be used for matching the pattern against
some data.

Both the parser and the automaton builder can be replaced with custom
implementations of the [`PatternParser`] and [`AutomatonBuilder`] traits.
*/

use bytepat_parser::ast::Node;
use bytepat_parser::Error as ParseError;
use bytepat_parser::Parser;

use crate::automaton::PatternId;
use crate::dfa;
use crate::matcher::Matcher;
use crate::nfa::{GlushkovBuilder, Nfa};

#[doc(inline)]
pub use crate::compiler::errors::*;

mod errors;
mod optimizer;

#[cfg(test)]
mod tests;

/// Compiles a byte pattern with the default settings.
///
/// # Example
///
/// ```
/// let matcher = bytepat::compile("4d 5a (90|cc)").unwrap();
/// assert!(matcher.accepts(b"MZ\x90"));
/// assert!(!matcher.accepts(b"MZ"));
/// ```
pub fn compile(pattern: &str) -> Result<Matcher, Error> {
    Compiler::new().compile(pattern)
}

/// Produces an AST from the text of a pattern.
pub trait PatternParser {
    /// Parses `pattern`.
    fn parse(&self, pattern: &str) -> Result<Node, ParseError>;
}

impl PatternParser for Parser {
    fn parse(&self, pattern: &str) -> Result<Node, ParseError> {
        Parser::parse(self, pattern)
    }
}

/// Produces an NFA from an AST.
pub trait AutomatonBuilder {
    /// Builds the automaton for `node`.
    fn build(&self, node: &Node) -> Result<Nfa, Error>;
}

impl AutomatonBuilder for GlushkovBuilder {
    fn build(&self, node: &Node) -> Result<Nfa, Error> {
        GlushkovBuilder::build(self, node)
    }
}

/// Compiles byte patterns into [`Matcher`]s.
pub struct Compiler {
    parser: Option<Box<dyn PatternParser>>,
    builder: Box<dyn AutomatonBuilder>,
    optimize: bool,
    deterministic: bool,
    colorize_errors: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Creates a new compiler with the default settings.
    pub fn new() -> Self {
        Self {
            parser: None,
            builder: Box::new(GlushkovBuilder::new()),
            optimize: cfg!(feature = "compile-time-optimization"),
            deterministic: true,
            colorize_errors: false,
        }
    }

    /// Enables or disables AST optimizations.
    ///
    /// When enabled, alternatives where every alternative matches a single
    /// byte, like `01|02|7f`, are replaced with the equivalent set,
    /// `[01 02 7f]`, which produces a smaller automaton. Enabled by default
    /// if the `compile-time-optimization` feature is active.
    pub fn optimize(&mut self, yes: bool) -> &mut Self {
        self.optimize = yes;
        self
    }

    /// Specifies whether the NFA is converted into a DFA. The default
    /// setting is `true`.
    pub fn deterministic(&mut self, yes: bool) -> &mut Self {
        self.deterministic = yes;
        self
    }

    /// Specifies whether parse errors contain ANSI escape sequences that
    /// make them look nicer on compatible consoles. The default setting is
    /// `false`. Has no effect when a custom parser is used.
    pub fn colorize_errors(&mut self, yes: bool) -> &mut Self {
        self.colorize_errors = yes;
        self
    }

    /// Uses a custom parser instead of [`bytepat_parser::Parser`].
    pub fn with_parser(&mut self, parser: Box<dyn PatternParser>) -> &mut Self {
        self.parser = Some(parser);
        self
    }

    /// Uses a custom automaton builder instead of [`GlushkovBuilder`].
    pub fn with_builder(
        &mut self,
        builder: Box<dyn AutomatonBuilder>,
    ) -> &mut Self {
        self.builder = builder;
        self
    }

    /// Compiles a single pattern. The final states of the automaton are
    /// associated to [`PatternId(0)`](PatternId).
    pub fn compile(&self, pattern: &str) -> Result<Matcher, Error> {
        self.compile_many(&[pattern])
    }

    /// Compiles multiple patterns into a single automaton.
    ///
    /// The final states of each pattern are associated to a [`PatternId`]
    /// equal to the pattern's index in `patterns`, so that matches tell
    /// which patterns matched.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepat::{Compiler, PatternId};
    ///
    /// let matcher = Compiler::new().compile_many(&["'ab'", "'a'."]).unwrap();
    /// let m = matcher.find(b"xxabc").unwrap();
    ///
    /// assert_eq!(m.range, 2..4);
    /// assert_eq!(m.patterns, vec![PatternId(0), PatternId(1)]);
    /// ```
    pub fn compile_many(&self, patterns: &[&str]) -> Result<Matcher, Error> {
        let mut nfas = Vec::with_capacity(patterns.len());

        for (i, pattern) in patterns.iter().enumerate() {
            let mut nfa = self.build_nfa(pattern)?;
            nfa.associate(PatternId::from(i));
            nfas.push(nfa);
        }

        if self.deterministic {
            Ok(Matcher::from(dfa::compile_many(nfas)?))
        } else {
            Ok(Matcher::from(Nfa::join(nfas)?))
        }
    }

    /// Parses `pattern` and returns its AST, optimized if optimizations
    /// are enabled.
    pub fn parse(&self, pattern: &str) -> Result<Node, Error> {
        let ast = match &self.parser {
            Some(parser) => parser.parse(pattern)?,
            None => {
                let mut parser = Parser::new();
                parser.colorize_errors(self.colorize_errors);
                parser.parse(pattern)?
            }
        };

        if self.optimize {
            Ok(optimizer::optimize(ast))
        } else {
            Ok(ast)
        }
    }

    /// Parses `pattern` and builds its NFA.
    pub fn build_nfa(&self, pattern: &str) -> Result<Nfa, Error> {
        let ast = self.parse(pattern)?;

        #[cfg(feature = "logging")]
        log::debug!("compiling pattern: {}", ast);

        self.builder.build(&ast)
    }
}
