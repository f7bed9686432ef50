//! Lookup seams between the combiner and its inputs.

use scorecard_ingest::{LookupError, SchemaExtractor, SpreadsheetExtractor};
use scorecard_model::{Diagnostic, Reporter, SchemaParameter, SpreadsheetMethodInfo};

/// Resolves a parameter's declared type.
pub trait TypeSource {
    /// Case-insensitive; `None` when the name is not declared.
    fn declaration(&self, name: &str) -> Option<&SchemaParameter>;
}

/// Resolves a parameter's computation method.
pub trait MethodSource {
    /// Reports its own lookup problems; `Err` means no usable method.
    fn method_info(
        &self,
        name: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<SpreadsheetMethodInfo, LookupError>;
}

impl TypeSource for SchemaExtractor {
    fn declaration(&self, name: &str) -> Option<&SchemaParameter> {
        self.lookup(name)
    }
}

impl MethodSource for SpreadsheetExtractor {
    fn method_info(
        &self,
        name: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<SpreadsheetMethodInfo, LookupError> {
        self.param_info(name, reporter)
    }
}

/// Tags every diagnostic passing through with the card being combined.
pub(crate) struct CardScope<'a> {
    card: &'a str,
    inner: &'a mut dyn Reporter,
}

impl<'a> CardScope<'a> {
    pub(crate) fn new(card: &'a str, inner: &'a mut dyn Reporter) -> Self {
        Self { card, inner }
    }
}

impl Reporter for CardScope<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let diagnostic = if diagnostic.card.is_some() {
            diagnostic
        } else {
            diagnostic.for_card(self.card)
        };
        self.inner.report(diagnostic);
    }
}
