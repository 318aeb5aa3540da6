use std::num::NonZeroUsize;

use bstr::{BStr, ByteSlice};
use pest::Parser as PestParser;

use crate::ast::Node;
use crate::cst::CST;
use crate::Span;

#[doc(inline)]
pub use crate::parser::errors::*;
pub use crate::parser::grammar::Rule as GrammarRule;

pub(crate) use crate::parser::context::*;
pub(crate) use crate::parser::cst2ast::*;
pub(crate) use crate::report::*;

mod context;
mod cst2ast;
mod errors;

#[cfg(test)]
mod tests;

/// A structure that describes the source code of a byte pattern.
///
/// This structure contains a reference to the pattern itself, and an
/// optional `origin` that tells where the pattern came from. The most
/// common use for `origin` is indicating the path of the file from where
/// the pattern was read, but it can contain any arbitrary string. This
/// string, if provided, will appear in error messages. For example, in
/// this error message `origin` was set to `mz.pat`:
///
/// ```text
/// error[E001]: syntax error
///  --> mz.pat:1:4
///   |
/// 1 | 4d 5
///   |    ^ expected byte ...
/// ```
///
/// # Example
///
/// ```
/// use bytepat_parser::SourceCode;
/// let src = SourceCode::from("4d 5a").with_origin("mz.pat");
/// ```
#[derive(Debug, Clone)]
pub struct SourceCode<'src> {
    /// A reference to the pattern itself. This is a BStr because the
    /// pattern could contain non-UTF8 content.
    pub(crate) raw: &'src BStr,
    /// A reference to the pattern after validating that it is valid UTF-8.
    pub(crate) valid: Option<&'src str>,
    /// An optional string that tells which is the origin of the pattern.
    /// Usually a file path.
    pub(crate) origin: Option<String>,
}

impl<'src> SourceCode<'src> {
    /// Sets a string that describes the origin of the pattern.
    pub fn with_origin(self, origin: &str) -> Self {
        Self { origin: Some(origin.to_owned()), ..self }
    }

    /// Returns the pattern as a `&str`, or an error if it is not valid
    /// UTF-8.
    fn as_str(&mut self) -> Result<&'src str, bstr::Utf8Error> {
        match self.valid {
            Some(s) => Ok(s),
            None => {
                let src = self.raw.to_str()?;
                self.valid = Some(src);
                Ok(src)
            }
        }
    }
}

impl<'src> From<&'src str> for SourceCode<'src> {
    /// Creates a new [`SourceCode`] from a `&str`.
    fn from(src: &'src str) -> Self {
        Self { raw: BStr::new(src), valid: Some(src), origin: None }
    }
}

impl<'src> From<&'src String> for SourceCode<'src> {
    /// Creates a new [`SourceCode`] from a `&String`.
    fn from(src: &'src String) -> Self {
        Self::from(src.as_str())
    }
}

impl<'src> From<&'src [u8]> for SourceCode<'src> {
    /// Creates a new [`SourceCode`] from a `&[u8]`.
    ///
    /// As `src` is not guaranteed to be a valid UTF-8 string, the parser
    /// verifies it and returns an error if invalid UTF-8 characters are
    /// found.
    fn from(src: &'src [u8]) -> Self {
        Self { raw: BStr::new(src), valid: None, origin: None }
    }
}

/// Receives the text of a byte pattern and produces either a Concrete
/// Syntax Tree (CST) or an Abstract Syntax Tree (AST).
#[derive(Default)]
pub struct Parser {
    report_builder: ReportBuilder,
}

impl Parser {
    /// Creates a new byte pattern parser.
    pub fn new() -> Self {
        // Limits the number of calls made to some of the Pest parser's
        // internal functions, so that pathological cases, like deeply
        // nested parenthesis, don't run forever.
        pest::set_call_limit(NonZeroUsize::new(50_000_000));
        Self { report_builder: ReportBuilder::new() }
    }

    /// Specifies whether the parser should produce colorful error messages.
    ///
    /// Colorized error messages contain ANSI escape sequences that make them
    /// look nicer on compatible consoles. The default setting is `false`.
    pub fn colorize_errors(&mut self, yes: bool) -> &mut Self {
        self.report_builder.with_colors(yes);
        self
    }

    /// Parses a byte pattern and returns the root of its Abstract Syntax
    /// Tree (AST).
    ///
    /// `src` can be any type that implements [`Into<SourceCode>`], which
    /// includes `&str`, `&[u8]`, and [`SourceCode`] itself.
    ///
    /// Sequences and alternatives with a single element are collapsed into
    /// that element, so the root of `01` is a [`Node::Byte`], not a
    /// [`Node::Sequence`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bytepat_parser::Parser;
    /// use bytepat_parser::ast::NodeKind;
    ///
    /// let ast = Parser::new().parse("4d 5a (90|cc)").unwrap();
    /// assert_eq!(ast.kind(), NodeKind::Sequence);
    ///
    /// assert!(Parser::new().parse("4d 5").is_err());
    /// ```
    pub fn parse<'src, S>(&self, src: S) -> Result<Node, Error>
    where
        S: Into<SourceCode<'src>>,
    {
        let src = src.into();
        let len = src.raw.len();

        // Comments and whitespaces are not needed for building the AST.
        let mut cst = self.build_cst(src)?.comments(false).whitespaces(false);

        let mut ctx = Context::new(&self.report_builder);

        match cst.next() {
            Some(root) if root.as_rule() == GrammarRule::pattern => {
                pattern_from_cst(&mut ctx, root, len)
            }
            _ => Err(Error::from(ErrorInfo::empty_pattern(
                &self.report_builder,
                Span::new(0, len),
            ))),
        }
    }

    /// Builds the Concrete Syntax Tree (CST) for a byte pattern.
    ///
    /// The CST returned by this function holds references to the original
    /// pattern, which can't be dropped until the CST is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytepat_parser::{Parser, SourceCode};
    /// let src = SourceCode::from("4d 5a # MZ").with_origin("mz.pat");
    /// let cst = Parser::new().build_cst(src).unwrap();
    /// ```
    pub fn build_cst<'src, S>(&self, src: S) -> Result<CST<'src>, Error>
    where
        S: Into<SourceCode<'src>>,
    {
        let mut src = src.into();

        // The source is registered even if it is not valid UTF-8, so that
        // the report about the invalid UTF-8 can be built. Invalid
        // characters are replaced with U+FFFD in the registered copy.
        self.report_builder.register_source(&src);

        match src.as_str() {
            Ok(src) => {
                let pairs =
                    grammar::ParserImpl::parse(GrammarRule::pattern, src)
                        .map_err(|pest_error| {
                            self.report_builder.convert_pest_error(pest_error)
                        })?;

                Ok(CST {
                    comments: false,
                    whitespaces: false,
                    pairs: Box::new(pairs),
                })
            }
            Err(err) => {
                let span_start = err.valid_up_to();
                // Invalid bytes are replaced with U+FFFD in the registered
                // source, which takes 3 bytes. Rounding the length up to a
                // multiple of 3 makes the span end at a character boundary.
                let span_end = match err.error_len() {
                    Some(error_len) => {
                        span_start + error_len.next_multiple_of(3)
                    }
                    None => span_start,
                };

                Err(Error::from(ErrorInfo::invalid_utf_8(
                    &self.report_builder,
                    Span::new(span_start, span_end),
                )))
            }
        }
    }
}

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "parser/grammar.pest"]
    pub struct ParserImpl;
}
