//! Structured diagnostics collected while reconciling score card sources.
//!
//! Components never write to a process-wide logger of their own. Each
//! operation that can hit a non-fatal problem takes a [`Reporter`] and hands
//! it a [`Diagnostic`]; the caller decides what to do with the collection.
//! [`DiagnosticReport`] is the default collector and also forwards every
//! entry to `tracing` so diagnostics show up in the regular log stream.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong. Each kind has a stable code used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// PMML file could not be read.
    PmmlUnreadable,
    /// Field declaration line is not a well-formed XML element.
    PmmlMalformedLine,
    /// Field declaration has no usable `name` attribute.
    PmmlMissingFieldName,
    /// No model declaration with a `modelName` was found.
    PmmlMissingModelName,
    /// Two PMML files declare the same card name.
    PmmlDuplicateCardName,
    /// Schema line does not follow the `name="…" type="…"` layout.
    SchemaMalformedLine,
    /// Schema line declares a type other than decimal or string.
    SchemaUnknownType,
    /// The same name is declared more than once in the schema.
    SchemaDuplicateName,
    /// No spreadsheet row references the parameter.
    SpreadsheetNotFound,
    /// Rows reference the parameter but none carries a method.
    SpreadsheetMissingMethod,
    /// Rows for the parameter disagree on the method.
    SpreadsheetAmbiguousMethod,
    /// Parameter is missing from the schema.
    MissingType,
    /// Parameter was dropped from its card.
    ParameterSkipped,
    /// Card could not be combined.
    CardRejected,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::PmmlUnreadable => "PMML001",
            DiagnosticKind::PmmlMalformedLine => "PMML002",
            DiagnosticKind::PmmlMissingFieldName => "PMML003",
            DiagnosticKind::PmmlMissingModelName => "PMML004",
            DiagnosticKind::PmmlDuplicateCardName => "PMML005",
            DiagnosticKind::SchemaMalformedLine => "SCHEMA001",
            DiagnosticKind::SchemaUnknownType => "SCHEMA002",
            DiagnosticKind::SchemaDuplicateName => "SCHEMA003",
            DiagnosticKind::SpreadsheetNotFound => "SHEET001",
            DiagnosticKind::SpreadsheetMissingMethod => "SHEET002",
            DiagnosticKind::SpreadsheetAmbiguousMethod => "SHEET003",
            DiagnosticKind::MissingType => "COMBINE001",
            DiagnosticKind::ParameterSkipped => "COMBINE002",
            DiagnosticKind::CardRejected => "COMBINE003",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single non-fatal problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// File the problem was found in.
    pub source: Option<PathBuf>,
    /// 1-based line number within `source`.
    pub line: Option<usize>,
    /// Score card the problem belongs to.
    pub card: Option<String>,
    /// Parameter the problem belongs to.
    pub parameter: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            source: None,
            line: None,
            card: None,
            parameter: None,
        }
    }

    #[must_use]
    pub fn at(mut self, source: impl Into<PathBuf>, line: usize) -> Self {
        self.source = Some(source.into());
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn in_file(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn for_card(mut self, card: impl Into<String>) -> Self {
        self.card = Some(card.into());
        self
    }

    #[must_use]
    pub fn for_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// `file:line` style location, when known.
    pub fn location(&self) -> Option<String> {
        let source = self.source.as_ref()?;
        Some(match self.line {
            Some(line) => format!("{}:{line}", source.display()),
            None => source.display().to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)?;
        if let Some(location) = self.location() {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

/// Sink for diagnostics, passed explicitly to every component that reports.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn kind_count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.kind == kind)
            .count()
    }

    /// Diagnostics attached to one card.
    pub fn for_card<'a>(&'a self, card: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.card.as_deref() == Some(card))
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

impl Reporter for DiagnosticReport {
    fn report(&mut self, diagnostic: Diagnostic) {
        let location = diagnostic.location().unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                code = diagnostic.kind.code(),
                location = %location,
                card = diagnostic.card.as_deref().unwrap_or(""),
                parameter = diagnostic.parameter.as_deref().unwrap_or(""),
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                code = diagnostic.kind.code(),
                location = %location,
                card = diagnostic.card.as_deref().unwrap_or(""),
                parameter = diagnostic.parameter.as_deref().unwrap_or(""),
                "{}",
                diagnostic.message
            ),
        }
        self.diagnostics.push(diagnostic);
    }
}
