use crate::cst::CSTNode;
use crate::report::ReportBuilder;
use crate::Span;

/// A structure that holds information about the process of building the
/// AST from the CST.
pub(crate) struct Context<'rb> {
    /// Used for building error messages.
    pub(crate) report_builder: &'rb ReportBuilder,
}

impl<'rb> Context<'rb> {
    pub(crate) fn new(report_builder: &'rb ReportBuilder) -> Self {
        Self { report_builder }
    }

    /// Creates a new [`Span`] from [`CSTNode`].
    pub(crate) fn span(&self, node: &CSTNode) -> Span {
        Span::from(node.as_span())
    }
}
