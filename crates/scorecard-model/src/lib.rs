pub mod card;
pub mod diagnostics;
pub mod error;
pub mod lookup;
pub mod param;

pub use card::{ScoreCard, ScoreCardExt};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticReport, Reporter, Severity};
pub use error::{ModelError, Result};
pub use lookup::CaseInsensitiveIndex;
pub use param::{
    FullParameter, MethodSpec, ParamType, RawParameter, SchemaParameter, SpreadsheetMethodInfo,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_report_counts() {
        let mut report = DiagnosticReport::new();
        report.report(
            Diagnostic::error(DiagnosticKind::SpreadsheetAmbiguousMethod, "two methods")
                .for_parameter("LIMIT"),
        );
        report.report(
            Diagnostic::warning(DiagnosticKind::SchemaDuplicateName, "declared twice")
                .at("model.txt", 4),
        );
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        assert_eq!(report.kind_count(DiagnosticKind::SchemaDuplicateName), 1);
    }

    #[test]
    fn card_ext_serializes() {
        let card = ScoreCardExt::new(
            "INC00_NAME",
            vec![FullParameter {
                name: "AGE".to_string(),
                param_type: ParamType::Decimal,
                pmml_name: "age".to_string(),
                method: MethodSpec::Single("dmi_Get_Age".to_string()),
            }],
        );
        let json = serde_json::to_string(&card).expect("serialize card");
        assert!(json.contains("\"param_type\":\"decimal\""));
        assert!(json.contains("\"method\":\"dmi_Get_Age\""));
        let round: ScoreCardExt = serde_json::from_str(&json).expect("deserialize card");
        assert_eq!(round, card);
    }
}
