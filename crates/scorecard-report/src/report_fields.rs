//! Report field paths for a card.

use scorecard_model::ScoreCardExt;

use crate::error::{RenderError, Result};
use crate::options::{RenderOptions, ReportFieldsLayout};

const ACTIVE_CDA: &str = "/Application/CDA[@CDAISACTIVE='Active']";

/// Fixed suffix of every advanced layout line.
const ADVANCED_FLAGS: &str = "1;1;1";

/// One report field: the configuration key and the path it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    pub key: String,
    pub path: String,
}

impl ReportField {
    fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// Card header paths, one path per parameter, then the card trailer paths.
pub fn report_fields(card: &ScoreCardExt) -> Vec<ReportField> {
    let name = card.score_name();
    let mut fields = vec![
        ReportField::new(
            "CDASCRNAME",
            format!("{ACTIVE_CDA}/CDAScore[@CDASCRNAME='{name}']/@CDASCRNAME"),
        ),
        ReportField::new("CDADATE", format!("{ACTIVE_CDA}/@CDADATE")),
        ReportField::new(
            "SCSFGROUPID",
            "/Application/ServiceCall/SCBurRes/SCSINGLE_FORMAT/@SCSFGROUPID",
        ),
    ];

    fields.extend(card.params().iter().map(|param| {
        ReportField::new(
            format!("#{}", param.name),
            format!(
                "{ACTIVE_CDA}/CDAScore/CDAScoreParam[@CDASPNAME='{}']/@CDASPVALUE",
                param.name
            ),
        )
    }));

    fields.push(ReportField::new(
        "FinalScore",
        format!("/Application/ApplicationScoring/ScoreModelOutput[@ScoreModelName='{name}']/@FinalScore"),
    ));
    for output in ["Prediction_proba", "Calibrated_Score"] {
        fields.push(ReportField::new(
            output,
            format!(
                "{ACTIVE_CDA}/CDAScore[@CDASCRNAME='{name}']/CDAScoreParam[@CDASPNAME='{output}']/@CDASPVALUE"
            ),
        ));
    }
    fields
}

/// Renders the report fields in the configured layout.
///
/// Fails when advanced line numbers would run past `u32::MAX`.
pub fn render_report_fields(card: &ScoreCardExt, options: &RenderOptions) -> Result<String> {
    let fields = report_fields(card);
    let mut out = String::new();
    match options.report_fields {
        ReportFieldsLayout::Standard => {
            for field in &fields {
                out.push_str(&field.path);
                out.push('\n');
            }
        }
        ReportFieldsLayout::Advanced => {
            let mut line = options.report_line_start;
            for field in &fields {
                line = line
                    .checked_add(1)
                    .ok_or_else(|| RenderError::LineNumberOverflow {
                        card: card.score_name().to_string(),
                        start: options.report_line_start,
                        fields: fields.len(),
                    })?;
                out.push_str(&format!(
                    "{}={};{ADVANCED_FLAGS};{line}\n",
                    escape_key(&field.key),
                    advanced_path(field)
                ));
            }
        }
    }
    Ok(out)
}

/// Parameter paths in the configuration file address the `#`-prefixed
/// engine variable.
fn advanced_path(field: &ReportField) -> String {
    match field.key.strip_prefix('#') {
        Some(param) => field
            .path
            .replace(&format!("[@CDASPNAME='{param}']"), &format!("[@CDASPNAME='#{param}']")),
        None => field.path.clone(),
    }
}

/// A leading `#` starts a comment in the configuration file.
fn escape_key(key: &str) -> String {
    if key.starts_with('#') {
        format!("\\{key}")
    } else {
        key.to_string()
    }
}
