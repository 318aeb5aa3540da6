use std::fmt::{Debug, Display, Formatter};

use thiserror::Error;

use crate::parser::grammar::Rule;
use crate::report::{Level, ReportBuilder};
use crate::Span;

/// An error occurred while parsing a byte pattern.
///
/// Each variant of [`ErrorInfo`] contains the pieces of information that
/// are relevant for that specific error. This information is usually
/// contained in the detailed report itself, but having access to the
/// individual pieces is useful for applications that can't rely on
/// text-based reports.
#[derive(Eq, PartialEq)]
pub struct Error(Box<ErrorInfo>);

impl Error {
    /// Returns a unique error code identifying the type of error.
    #[inline]
    pub fn code(&self) -> &'static str {
        self.0.code()
    }

    /// Returns additional information about the error.
    #[inline]
    pub fn info(&self) -> &ErrorInfo {
        self.0.as_ref()
    }

    /// Returns the span of the pattern where the error was found.
    #[inline]
    pub fn span(&self) -> Span {
        self.0.span()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Error {}

impl From<ErrorInfo> for Error {
    fn from(value: ErrorInfo) -> Self {
        Self(Box::new(value))
    }
}

/// Additional information about an error occurred during parsing.
///
/// The [`Display`] implementation prints the detailed report.
#[rustfmt::skip]
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ErrorInfo {
    #[error("{detailed_report}")]
    SyntaxError {
        detailed_report: String,
        error_msg: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    EmptyPattern {
        detailed_report: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    InvalidString {
        detailed_report: String,
        error_msg: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    InvalidQuantifier {
        detailed_report: String,
        error_msg: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    InvalidInversion {
        detailed_report: String,
        error_msg: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    InvalidRange {
        detailed_report: String,
        error_msg: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    UnknownShorthand {
        detailed_report: String,
        shorthand: String,
        error_span: Span,
    },

    #[error("{detailed_report}")]
    InvalidUtf8 {
        detailed_report: String,
        error_span: Span,
    },
}

impl ErrorInfo {
    // Error codes, one per variant.
    pub(crate) const SYNTAX_ERROR: &'static str = "E001";
    pub(crate) const EMPTY_PATTERN: &'static str = "E002";
    pub(crate) const INVALID_STRING: &'static str = "E003";
    pub(crate) const INVALID_QUANTIFIER: &'static str = "E004";
    pub(crate) const INVALID_INVERSION: &'static str = "E005";
    pub(crate) const INVALID_RANGE: &'static str = "E006";
    pub(crate) const UNKNOWN_SHORTHAND: &'static str = "E007";
    pub(crate) const INVALID_UTF8: &'static str = "E008";

    /// Returns a unique error code identifying the type of error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorInfo::SyntaxError { .. } => Self::SYNTAX_ERROR,
            ErrorInfo::EmptyPattern { .. } => Self::EMPTY_PATTERN,
            ErrorInfo::InvalidString { .. } => Self::INVALID_STRING,
            ErrorInfo::InvalidQuantifier { .. } => Self::INVALID_QUANTIFIER,
            ErrorInfo::InvalidInversion { .. } => Self::INVALID_INVERSION,
            ErrorInfo::InvalidRange { .. } => Self::INVALID_RANGE,
            ErrorInfo::UnknownShorthand { .. } => Self::UNKNOWN_SHORTHAND,
            ErrorInfo::InvalidUtf8 { .. } => Self::INVALID_UTF8,
        }
    }

    /// Returns the title of the error, as it appears in the first line of
    /// the detailed report.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorInfo::SyntaxError { .. } => "syntax error",
            ErrorInfo::EmptyPattern { .. } => "empty pattern",
            ErrorInfo::InvalidString { .. } => "invalid string",
            ErrorInfo::InvalidQuantifier { .. } => "invalid quantifier",
            ErrorInfo::InvalidInversion { .. } => "invalid inversion",
            ErrorInfo::InvalidRange { .. } => "invalid range",
            ErrorInfo::UnknownShorthand { .. } => "unknown shorthand class",
            ErrorInfo::InvalidUtf8 { .. } => "invalid UTF-8",
        }
    }

    /// Returns the span where the error was found.
    pub fn span(&self) -> Span {
        match self {
            ErrorInfo::SyntaxError { error_span, .. }
            | ErrorInfo::EmptyPattern { error_span, .. }
            | ErrorInfo::InvalidString { error_span, .. }
            | ErrorInfo::InvalidQuantifier { error_span, .. }
            | ErrorInfo::InvalidInversion { error_span, .. }
            | ErrorInfo::InvalidRange { error_span, .. }
            | ErrorInfo::UnknownShorthand { error_span, .. }
            | ErrorInfo::InvalidUtf8 { error_span, .. } => *error_span,
        }
    }

    pub(crate) fn empty_pattern(
        report_builder: &ReportBuilder,
        error_span: Span,
    ) -> Self {
        let detailed_report = report_builder.create_report(
            Level::Error,
            error_span,
            Self::EMPTY_PATTERN,
            "empty pattern",
            vec![(
                error_span,
                "the pattern doesn't contain any value".to_owned(),
                Level::Error,
            )],
            None,
        );
        ErrorInfo::EmptyPattern { detailed_report, error_span }
    }

    pub(crate) fn invalid_string(
        report_builder: &ReportBuilder,
        error_msg: String,
        error_span: Span,
    ) -> Self {
        let detailed_report = Self::labeled_report(
            report_builder,
            Self::INVALID_STRING,
            "invalid string",
            &error_msg,
            error_span,
        );
        ErrorInfo::InvalidString { detailed_report, error_msg, error_span }
    }

    pub(crate) fn invalid_quantifier(
        report_builder: &ReportBuilder,
        error_msg: String,
        error_span: Span,
    ) -> Self {
        let detailed_report = Self::labeled_report(
            report_builder,
            Self::INVALID_QUANTIFIER,
            "invalid quantifier",
            &error_msg,
            error_span,
        );
        ErrorInfo::InvalidQuantifier { detailed_report, error_msg, error_span }
    }

    pub(crate) fn invalid_inversion(
        report_builder: &ReportBuilder,
        error_msg: String,
        error_span: Span,
    ) -> Self {
        let detailed_report = Self::labeled_report(
            report_builder,
            Self::INVALID_INVERSION,
            "invalid inversion",
            &error_msg,
            error_span,
        );
        ErrorInfo::InvalidInversion { detailed_report, error_msg, error_span }
    }

    pub(crate) fn invalid_range(
        report_builder: &ReportBuilder,
        error_msg: String,
        error_span: Span,
    ) -> Self {
        let detailed_report = Self::labeled_report(
            report_builder,
            Self::INVALID_RANGE,
            "invalid range",
            &error_msg,
            error_span,
        );
        ErrorInfo::InvalidRange { detailed_report, error_msg, error_span }
    }

    pub(crate) fn unknown_shorthand(
        report_builder: &ReportBuilder,
        shorthand: String,
        error_span: Span,
    ) -> Self {
        let detailed_report = report_builder.create_report(
            Level::Error,
            error_span,
            Self::UNKNOWN_SHORTHAND,
            &format!("unknown shorthand class `{shorthand}`"),
            vec![(error_span, "unknown shorthand".to_owned(), Level::Error)],
            Some(
                "valid shorthands are: \\t \\n \\v \\f \\r \\e \\d \\D \\l \
                 \\L \\u \\U \\i \\I \\w \\W \\s \\S"
                    .to_owned(),
            ),
        );
        ErrorInfo::UnknownShorthand { detailed_report, shorthand, error_span }
    }

    pub(crate) fn invalid_utf_8(
        report_builder: &ReportBuilder,
        error_span: Span,
    ) -> Self {
        let detailed_report = report_builder.create_report(
            Level::Error,
            error_span,
            Self::INVALID_UTF8,
            "invalid UTF-8",
            vec![(
                error_span,
                "invalid UTF-8 character".to_owned(),
                Level::Error,
            )],
            None,
        );
        ErrorInfo::InvalidUtf8 { detailed_report, error_span }
    }

    fn labeled_report(
        report_builder: &ReportBuilder,
        code: &str,
        title: &str,
        error_msg: &str,
        error_span: Span,
    ) -> String {
        report_builder.create_report(
            Level::Error,
            error_span,
            code,
            title,
            vec![(error_span, error_msg.to_owned(), Level::Error)],
            None,
        )
    }

    pub(crate) fn syntax_error_message<F>(
        expected: &[Rule],
        unexpected: &[Rule],
        mut f: F,
    ) -> String
    where
        F: FnMut(&Rule) -> &str,
    {
        // COMMENT and WHITESPACE are not silent in the grammar because they
        // must appear in the CST, but they are not useful in error messages
        // like "expected byte or WHITESPACE".
        let expected: Vec<&str> = expected
            .iter()
            .filter(|&&rule| rule != Rule::COMMENT && rule != Rule::WHITESPACE)
            .map(&mut f)
            .collect();

        let unexpected: Vec<&str> = unexpected
            .iter()
            .filter(|&&rule| rule != Rule::COMMENT && rule != Rule::WHITESPACE)
            .map(&mut f)
            .collect();

        match (unexpected.is_empty(), expected.is_empty()) {
            (false, false) => format!(
                "unexpected {}; expected {}",
                Self::join_with_or(&unexpected, false),
                Self::join_with_or(&expected, false)
            ),
            (false, true) => {
                format!("unexpected {}", Self::join_with_or(&unexpected, false))
            }
            (true, false) => {
                format!("expected {}", Self::join_with_or(&expected, false))
            }
            (true, true) => "unknown parsing error".to_owned(),
        }
    }

    /// Joins strings with commas, putting "or" before the last one. For
    /// example, `["s1", "s2", "s3"]` produces:
    ///
    /// ```text
    /// s1, s2, or s3
    /// ```
    ///
    /// If `quotes` is true, the strings are enclosed in back ticks.
    pub fn join_with_or<S: ToString>(s: &[S], quotes: bool) -> String {
        let mut strings: Vec<String> = if quotes {
            s.iter().map(|s| format!("`{}`", s.to_string())).collect()
        } else {
            s.iter().map(|s| s.to_string()).collect()
        };

        strings.sort();
        strings.dedup();

        match strings.len() {
            0 => String::new(),
            1 => strings[0].to_owned(),
            2 => format!("{} or {}", strings[0], strings[1]),
            l => {
                format!(
                    "{}, or {}",
                    strings[..l - 1].join(", "),
                    strings[l - 1]
                )
            }
        }
    }

    /// Given a grammar rule returns the string used for referring to it in
    /// error messages.
    pub(crate) fn printable_string(rule: &Rule) -> &str {
        match rule {
            Rule::PIPE => "pipe `|`",
            Rule::STAR => "asterisk `*`",
            Rule::PLUS => "plus `+`",
            Rule::QUESTION => "question mark `?`",
            Rule::CARET => "caret `^`",
            Rule::HYPHEN => "hyphen `-`",
            Rule::COMMA => "comma `,`",
            Rule::LPAREN => "opening parenthesis `(`",
            Rule::RPAREN => "closing parenthesis `)`",
            Rule::LBRACKET => "opening bracket `[`",
            Rule::RBRACKET => "closing bracket `]`",
            Rule::LBRACE => "opening brace `{`",
            Rule::RBRACE => "closing brace `}`",
            Rule::EOI => "end of pattern",

            Rule::alternatives | Rule::sequence | Rule::quantified => {
                "pattern"
            }
            Rule::atom | Rule::leaf | Rule::set_member => "value",
            Rule::quantifier | Rule::repeat => "quantifier",
            Rule::count => "number",
            Rule::group => "group",
            Rule::set => "set",
            Rule::range => "range",
            Rule::range_operand | Rule::byte => "byte",
            Rule::all_bitmask | Rule::any_bitmask => "bitmask",
            Rule::dot => "dot `.`",
            Rule::string | Rule::string_text => "string",
            Rule::ci_string | Rule::ci_string_text => {
                "case-insensitive string"
            }
            Rule::shorthand => "shorthand class",

            Rule::pattern => "pattern",

            // Filtered out by `syntax_error_message`.
            Rule::COMMENT | Rule::WHITESPACE => unreachable!(),
        }
    }
}
