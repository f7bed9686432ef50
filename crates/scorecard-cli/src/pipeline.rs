//! Pipeline stages shared by the commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use scorecard_combine::{CombineError, Combiner};
use scorecard_ingest::{
    FileSet, PmmlExtractor, SchemaExtractor, SpreadsheetExtractor, SpreadsheetRow,
    resolve_file_set,
};
use scorecard_model::{DiagnosticReport, SchemaParameter, ScoreCard, ScoreCardExt, Severity};
use scorecard_report::{RenderError, RenderedCard, render_card};

use crate::config::RunOptions;

/// Outcome of a card through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Rendered,
    Rejected,
    RenderFailed,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Rendered => "rendered",
            CardStatus::Rejected => "rejected",
            CardStatus::RenderFailed => "render failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardSummary {
    pub score_name: String,
    pub source: PathBuf,
    /// Parameters declared in the PMML card.
    pub declared: usize,
    /// Parameters in the combined card; `None` when it was rejected.
    pub combined: Option<usize>,
    pub ambiguous: usize,
    pub errors: usize,
    pub warnings: usize,
    pub status: CardStatus,
}

#[derive(Debug)]
pub struct PipelineRun {
    pub files: FileSet,
    pub cards: Vec<CardSummary>,
    pub rendered: Vec<RenderedCard>,
    pub combine_failures: Vec<CombineError>,
    pub render_failures: Vec<RenderError>,
    pub report: DiagnosticReport,
}

impl PipelineRun {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
            || !self.combine_failures.is_empty()
            || !self.render_failures.is_empty()
    }
}

/// The schema and spreadsheet of an input directory.
pub struct Lookups {
    pub schema: SchemaExtractor,
    pub sheet: SpreadsheetExtractor,
}

/// Loads the two name-keyed sources. Both are required.
pub fn load_lookups(files: &FileSet, report: &mut DiagnosticReport) -> Result<Lookups> {
    let schema = SchemaExtractor::load(&files.schema, report).context("load schema")?;
    let sheet = SpreadsheetExtractor::load(&files.spreadsheet).context("load spreadsheet")?;
    Ok(Lookups { schema, sheet })
}

/// Runs ingest, combine and render over one input directory.
///
/// Only a missing or unreadable required input is an `Err`; every other
/// problem ends up in the diagnostic report.
pub fn run_pipeline(input_dir: &Path, options: &RunOptions) -> Result<PipelineRun> {
    let run_span = info_span!("pipeline", input = %input_dir.display());
    let _run_guard = run_span.enter();
    let mut report = DiagnosticReport::new();

    // =========================================================================
    // Stage 1: Ingest - classify files, parse PMML, load schema and spreadsheet
    // =========================================================================
    let ingest_start = Instant::now();
    let (files, cards, lookups) = info_span!("ingest").in_scope(|| -> Result<_> {
        let files = resolve_file_set(input_dir)
            .with_context(|| format!("resolve inputs in {}", input_dir.display()))?;
        let cards = PmmlExtractor::load(&files.pmml, &mut report)
            .context("load PMML cards")?
            .into_cards();
        let lookups = load_lookups(&files, &mut report)?;
        Ok((files, cards, lookups))
    })?;
    info!(
        cards = cards.len(),
        schema_params = lookups.schema.params().len(),
        sheet_rows = lookups.sheet.rows().len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2: Combine - join every card with types and methods
    // =========================================================================
    let combiner = Combiner::new(&lookups.schema, &lookups.sheet, options.combine);
    let outcome = info_span!("combine").in_scope(|| combiner.combine_all(&cards, &mut report));
    let (combined, combine_failures) = outcome.into_per_card();

    // =========================================================================
    // Stage 3: Render - generate the code sections
    // =========================================================================
    let mut rendered = Vec::with_capacity(combined.len());
    let mut render_failures = Vec::new();
    let mut statuses = Vec::with_capacity(combined.len());
    info_span!("render").in_scope(|| {
        for ext in &combined {
            let Some(ext) = ext else {
                statuses.push(CardStatus::Rejected);
                continue;
            };
            match render_card(ext, &options.render) {
                Ok(card) => {
                    rendered.push(card);
                    statuses.push(CardStatus::Rendered);
                }
                Err(error) => {
                    tracing::error!(card = ext.score_name(), %error, "render failed");
                    render_failures.push(error);
                    statuses.push(CardStatus::RenderFailed);
                }
            }
        }
    });

    let summaries = cards
        .iter()
        .zip(&combined)
        .zip(statuses)
        .map(|((card, ext), status)| summarize(card, ext.as_ref(), status, &report))
        .collect();
    info!(
        rendered = rendered.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "pipeline complete"
    );

    Ok(PipelineRun {
        files,
        cards: summaries,
        rendered,
        combine_failures,
        render_failures,
        report,
    })
}

fn summarize(
    card: &ScoreCard,
    ext: Option<&ScoreCardExt>,
    status: CardStatus,
    report: &DiagnosticReport,
) -> CardSummary {
    let (errors, warnings) =
        report
            .for_card(&card.score_name)
            .fold((0, 0), |(errors, warnings), diagnostic| match diagnostic.severity {
                Severity::Error => (errors + 1, warnings),
                Severity::Warning => (errors, warnings + 1),
            });
    CardSummary {
        score_name: card.score_name.clone(),
        source: card.source.clone(),
        declared: card.params.len(),
        combined: ext.map(|ext| ext.params().len()),
        ambiguous: ext.map_or(0, ScoreCardExt::ambiguous_count),
        errors,
        warnings,
        status,
    }
}

/// What each source knows about one parameter name.
#[derive(Debug)]
pub struct LookupResult {
    pub name: String,
    pub declarations: Vec<SchemaParameter>,
    pub headers: Vec<String>,
    pub rows: Vec<SpreadsheetRow>,
}

pub fn lookup_parameter(input_dir: &Path, name: &str) -> Result<(LookupResult, DiagnosticReport)> {
    let _span = info_span!("lookup", name = name).entered();
    let mut report = DiagnosticReport::new();
    let files = resolve_file_set(input_dir)
        .with_context(|| format!("resolve inputs in {}", input_dir.display()))?;
    let lookups = load_lookups(&files, &mut report)?;

    let result = LookupResult {
        name: name.to_string(),
        declarations: lookups
            .schema
            .declarations(name)
            .into_iter()
            .cloned()
            .collect(),
        headers: lookups.sheet.headers().to_vec(),
        rows: lookups.sheet.find_rows(name).into_iter().cloned().collect(),
    };
    Ok((result, report))
}
