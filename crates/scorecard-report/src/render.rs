//! Per-card rendering.

use scorecard_model::ScoreCardExt;
use serde::Serialize;

use crate::error::{RenderError, Result};
use crate::options::{RenderOptions, Section};
use crate::report_fields::render_report_fields;
use crate::templates;

/// All generated text for one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCard {
    pub score_name: String,
    pub runtime_logic: String,
    pub audit_logging: String,
    pub integration_glue: String,
    pub report_fields: String,
}

impl RenderedCard {
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::RuntimeLogic => &self.runtime_logic,
            Section::AuditLogging => &self.audit_logging,
            Section::IntegrationGlue => &self.integration_glue,
            Section::ReportFields => &self.report_fields,
        }
    }

    /// Sections in output order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &str)> {
        Section::ALL
            .into_iter()
            .map(move |section| (section, self.section(section)))
    }
}

pub fn render_card(card: &ScoreCardExt, options: &RenderOptions) -> Result<RenderedCard> {
    check_names(card)?;
    let name = card.score_name();

    let runtime_logic = card
        .params()
        .iter()
        .map(templates::runtime_logic)
        .collect::<Vec<_>>()
        .join("\n");
    let audit_logging: String = card.params().iter().map(templates::audit_logging).collect();

    let mut integration_glue = templates::glue_header(name);
    for param in card.params() {
        integration_glue.push_str(&templates::glue_assignment(name, param));
    }
    integration_glue.push_str(&templates::glue_trailer(name));

    let report_fields = render_report_fields(card, options)?;

    tracing::debug!(card = name, params = card.params().len(), "rendered card");

    Ok(RenderedCard {
        score_name: name.to_string(),
        runtime_logic,
        audit_logging,
        integration_glue,
        report_fields,
    })
}

/// Renders every card, stopping at the first card that cannot be rendered.
pub fn render_all(cards: &[ScoreCardExt], options: &RenderOptions) -> Result<Vec<RenderedCard>> {
    cards.iter().map(|card| render_card(card, options)).collect()
}

fn check_names(card: &ScoreCardExt) -> Result<()> {
    let names = std::iter::once(card.score_name()).chain(
        card.params()
            .iter()
            .flat_map(|param| [param.name.as_str(), param.pmml_name.as_str()]),
    );
    for name in names {
        if let Some(found) = name
            .chars()
            .find(|&c| matches!(c, '"' | '\'') || c.is_whitespace() || c.is_control())
        {
            return Err(RenderError::UnsafeName {
                card: card.score_name().to_string(),
                name: name.to_string(),
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_model::{FullParameter, MethodSpec, ParamType};

    fn param(name: &str) -> FullParameter {
        FullParameter {
            name: name.to_string(),
            param_type: ParamType::Decimal,
            pmml_name: name.to_string(),
            method: MethodSpec::Single("m".to_string()),
        }
    }

    #[test]
    fn test_quotes_in_names_are_rejected() {
        let card = ScoreCardExt::new("CARD", vec![param("AGE"), param("BAD'NAME")]);
        let err = render_card(&card, &RenderOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnsafeName {
                card: "CARD".to_string(),
                name: "BAD'NAME".to_string(),
                found: '\'',
            }
        );
    }

    #[test]
    fn test_sections_in_order() {
        let card = ScoreCardExt::new("CARD", vec![param("AGE")]);
        let rendered = render_card(&card, &RenderOptions::default()).unwrap();
        let order: Vec<_> = rendered.sections().map(|(section, _)| section).collect();
        assert_eq!(order, Section::ALL.to_vec());
        assert!(rendered.section(Section::IntegrationGlue).ends_with("}\n"));
    }

    #[test]
    fn test_empty_card_still_has_glue_and_fields() {
        let card = ScoreCardExt::new("EMPTY", Vec::new());
        let rendered = render_card(&card, &RenderOptions::default()).unwrap();
        assert!(rendered.runtime_logic.is_empty());
        assert!(rendered.audit_logging.is_empty());
        assert!(rendered.integration_glue.contains("_EMPTYIn is a EMPTYIn;"));
        assert_eq!(rendered.report_fields.lines().count(), 6);
    }
}
