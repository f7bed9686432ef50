use std::fmt;

use serde::{Deserialize, Serialize};

/// How report field paths are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFieldsLayout {
    /// One bare path per line, for pasting by hand.
    #[default]
    Standard,
    /// `KEY=PATH;1;1;1;N` lines for the report configuration file.
    Advanced,
}

impl ReportFieldsLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFieldsLayout::Standard => "standard",
            ReportFieldsLayout::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ReportFieldsLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub report_fields: ReportFieldsLayout,
    /// Advanced layout only: the first field is numbered `report_line_start + 1`.
    pub report_line_start: u32,
}

/// The four generated sections of a card, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    /// Fetch-and-fallback block per parameter.
    RuntimeLogic,
    /// One audit logging call per parameter.
    AuditLogging,
    /// Rules-engine glue passing parameters into the card.
    IntegrationGlue,
    ReportFields,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::RuntimeLogic,
        Section::AuditLogging,
        Section::IntegrationGlue,
        Section::ReportFields,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::RuntimeLogic => "runtime-logic",
            Section::AuditLogging => "audit-logging",
            Section::IntegrationGlue => "integration-glue",
            Section::ReportFields => "report-fields",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::RuntimeLogic => "Runtime logic",
            Section::AuditLogging => "Audit logging",
            Section::IntegrationGlue => "Integration glue",
            Section::ReportFields => "Report fields",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
