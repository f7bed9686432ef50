use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use scorecard_cli::config::{RunOptions, resolve_settings};
use scorecard_cli::pipeline::{LookupResult, PipelineRun, lookup_parameter, run_pipeline};
use scorecard_model::DiagnosticReport;
use scorecard_report::{RenderedCard, Section};

use crate::cli::{GenerateArgs, InputArgs, LookupArgs};

/// Settings file first, then flags on top.
fn run_options(args: &InputArgs) -> Result<RunOptions> {
    let file = resolve_settings(args.config.as_deref(), &args.input_dir)?;
    let options = file.merged_with(args.flag_settings()).run_options();
    info!(
        report_fields = %options.render.report_fields,
        report_line_start = options.render.report_line_start,
        missing_type = %options.combine.missing_type,
        missing_method = %options.combine.missing_method,
        "resolved run options"
    );
    Ok(options)
}

pub fn run_generate(args: &GenerateArgs) -> Result<PipelineRun> {
    let options = run_options(&args.input)?;
    let run = run_pipeline(&args.input.input_dir, &options)?;
    let section = args.section.map(Section::from);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for card in &run.rendered {
        write_card(&mut out, card, section).context("write generated code")?;
    }
    out.flush().context("flush generated code")?;
    Ok(run)
}

pub fn run_check(args: &InputArgs) -> Result<PipelineRun> {
    let options = run_options(args)?;
    run_pipeline(&args.input_dir, &options)
}

pub fn run_lookup(args: &LookupArgs) -> Result<(LookupResult, DiagnosticReport)> {
    lookup_parameter(&args.input_dir, &args.name)
}

fn write_card(out: &mut impl Write, card: &RenderedCard, only: Option<Section>) -> io::Result<()> {
    writeln!(out, "// ===== {} =====", card.score_name)?;
    for (section, text) in card.sections() {
        if only.is_some_and(|only| only != section) {
            continue;
        }
        writeln!(out, "// --- {} ---", section.title())?;
        write!(out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_model::{FullParameter, MethodSpec, ParamType, ScoreCardExt};
    use scorecard_report::{RenderOptions, render_card};

    fn card() -> RenderedCard {
        let ext = ScoreCardExt::new(
            "CARD",
            vec![FullParameter {
                name: "AGE".to_string(),
                param_type: ParamType::Decimal,
                pmml_name: "age".to_string(),
                method: MethodSpec::Single("dmi_Get_Age".to_string()),
            }],
        );
        render_card(&ext, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_write_single_section() {
        let mut out = Vec::new();
        write_card(&mut out, &card(), Some(Section::AuditLogging)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "// ===== CARD =====\n// --- Audit logging ---\n\
             dmw_App_AddScoreCardVariablesParam2CDA(\"AGE\", xScoreInput.AGE);\n\n"
        );
    }

    #[test]
    fn test_write_all_sections_in_order() {
        let mut out = Vec::new();
        write_card(&mut out, &card(), None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let positions: Vec<usize> = Section::ALL
            .iter()
            .map(|section| text.find(section.title()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
