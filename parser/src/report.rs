use std::borrow::Cow;
use std::cell::RefCell;

use pest::error::ErrorVariant::{CustomError, ParsingError};
use pest::error::InputLocation;

use crate::parser::{Error, ErrorInfo, GrammarRule, SourceCode};
use crate::Span;

pub type Level = annotate_snippets::Level;

/// Builds error reports.
///
/// `ReportBuilder` keeps a copy of the pattern being parsed, registered with
/// [`ReportBuilder::register_source`], and creates error reports with
/// annotated snippets of that pattern.
pub struct ReportBuilder {
    with_colors: bool,
    // RefCell allows registering the source from an immutable reference
    // to the report builder.
    source: RefCell<Option<CachedSource>>,
}

struct CachedSource {
    code: String,
    origin: Option<String>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    /// Creates a new instance of [`ReportBuilder`].
    pub fn new() -> Self {
        Self { with_colors: false, source: RefCell::new(None) }
    }

    /// Indicates whether the reports should have colors. By default, this is
    /// `false`.
    pub fn with_colors(&mut self, yes: bool) -> &mut Self {
        self.with_colors = yes;
        self
    }

    /// Registers the pattern that subsequent reports refer to, replacing the
    /// previously registered one.
    ///
    /// Patterns that are not valid UTF-8 are accepted, invalid characters
    /// are replaced with the UTF-8 replacement character.
    pub fn register_source(&self, src: &SourceCode) -> &Self {
        let code = if let Some(s) = src.valid {
            Cow::Borrowed(s)
        } else {
            String::from_utf8_lossy(src.raw.as_ref())
        };
        // Tabs are replaced with a single space. Spans are not affected
        // and the snippets are rendered correctly.
        self.source.replace(Some(CachedSource {
            code: code.replace('\t', " "),
            origin: src.origin.clone(),
        }));
        self
    }

    /// Creates a new error report.
    pub fn create_report(
        &self,
        level: Level,
        span: Span,
        code: &str,
        title: &str,
        labels: Vec<(Span, String, Level)>,
        note: Option<String>,
    ) -> String {
        let source = self.source.borrow();
        let (src, origin) = match source.as_ref() {
            Some(source) => (source.code.as_str(), source.origin.as_deref()),
            None => ("", None),
        };

        // Clamp spans to the registered source, so that a report is
        // produced even for spans that go beyond its end.
        let clamp =
            |span: Span| span.start().min(src.len())..span.end().min(src.len());

        let mut snippet = annotate_snippets::Snippet::source(src)
            .origin(origin.unwrap_or("pattern"))
            .fold(true);

        if labels.is_empty() {
            snippet = snippet.annotation(level.span(clamp(span)));
        }

        for (span, label, level) in &labels {
            snippet = snippet
                .annotation(level.span(clamp(*span)).label(label.as_str()));
        }

        let mut message = level.title(title).id(code).snippet(snippet);

        if let Some(note) = &note {
            message = message.footer(Level::Note.title(note.as_str()));
        }

        let renderer = if self.with_colors {
            annotate_snippets::Renderer::styled()
        } else {
            annotate_snippets::Renderer::plain()
        };

        let report = renderer.render(message).to_string();
        report
    }

    pub(crate) fn convert_pest_error(
        &self,
        pest_error: pest::error::Error<GrammarRule>,
    ) -> Error {
        let error_span = match pest_error.location {
            InputLocation::Pos(p) => Span::new(p, p),
            InputLocation::Span(span) => Span::new(span.0, span.1),
        };

        let (title, error_msg, note) = match &pest_error.variant {
            CustomError { message } => {
                // Pest returns "call limit reached" when the limit set with
                // pest::set_call_limit is exceeded.
                if message == "call limit reached" {
                    (
                        "pattern is too complex or large",
                        "parser aborted here".to_owned(),
                        Some(
                            "reduce the number of nested parenthesis or the \
                            size of the pattern"
                                .to_owned(),
                        ),
                    )
                } else {
                    ("syntax error", message.to_owned(), None)
                }
            }
            ParsingError { positives, negatives } => (
                "syntax error",
                ErrorInfo::syntax_error_message(
                    positives,
                    negatives,
                    ErrorInfo::printable_string,
                ),
                None,
            ),
        };

        let detailed_report = self.create_report(
            Level::Error,
            error_span,
            ErrorInfo::SYNTAX_ERROR,
            title,
            vec![(error_span, error_msg.clone(), Level::Error)],
            note,
        );

        Error::from(ErrorInfo::SyntaxError {
            detailed_report,
            error_msg,
            error_span,
        })
    }
}
