//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use scorecard_cli::config::{CONFIG_FILENAME, Settings, resolve_settings};
use scorecard_cli::pipeline::{CardStatus, lookup_parameter, run_pipeline};
use scorecard_combine::MissingPolicy;
use scorecard_model::DiagnosticKind;
use scorecard_report::{ReportFieldsLayout, Section};

const SCHEMA: &str = r#"<xs:attribute name="AGE" type="xs:decimal" use="optional"/>
<xs:attribute name="GENDER" type="xs:string" use="optional"/>
<xs:attribute name="LIMIT" type="xs:decimal" use="optional"/>
"#;

fn card(model: &str, fields: &[&str]) -> String {
    let mut pmml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<PMML version=\"4.2\">\n  <DataDictionary>\n");
    for field in fields {
        pmml.push_str(&format!(
            "    <DataField dataType=\"double\" name=\"{field}\" optype=\"continuous\"/>\n"
        ));
    }
    pmml.push_str(&format!(
        "  </DataDictionary>\n  <RegressionModel functionName=\"classification\" modelName=\"{model}\">\n  </RegressionModel>\n</PMML>\n"
    ));
    pmml
}

fn write_workbook(path: &Path) {
    let rows = [
        ["Var_Name", "OMDM Data_Method"],
        ["AGE", "dmi_Get_Age"],
        ["gender", "dms_Get_Gender"],
        ["LIMIT", "m1"],
        ["limit", "m2"],
        ["INCOME", "dmi_Get_Income"],
    ];
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Data").unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn fixture_dir(cards: &[(&str, &str, &[&str])]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_workbook(&dir.path().join("params.xlsx"));
    fs::write(dir.path().join("model.txt"), SCHEMA).unwrap();
    for (file, model, fields) in cards {
        fs::write(dir.path().join(file), card(model, fields)).unwrap();
    }
    dir
}

#[test]
fn test_clean_run_renders_every_card() {
    let dir = fixture_dir(&[
        ("a.pmml", "INC00_NAME", &["age", "Gender"]),
        ("b.pmml", "INC01_NAME", &["AGE"]),
    ]);
    let run = run_pipeline(dir.path(), &Settings::default().run_options()).unwrap();

    assert!(!run.has_errors());
    assert!(run.report.is_empty());
    let names: Vec<_> = run.rendered.iter().map(|card| card.score_name.as_str()).collect();
    assert_eq!(names, vec!["INC00_NAME", "INC01_NAME"]);
    assert_eq!(run.cards[0].declared, 2);
    assert_eq!(run.cards[0].combined, Some(2));
    assert_eq!(run.cards[0].status, CardStatus::Rendered);

    let glue = run.rendered[0].section(Section::IntegrationGlue);
    assert!(glue.contains("_INC00_NAMEIn.age = theApp.CDA_NdScoreModel.Cda_NdScoreModelInputInfo.AGE;"));
}

#[test]
fn test_rejected_card_does_not_stop_the_batch() {
    let dir = fixture_dir(&[
        ("a.pmml", "INC00_NAME", &["age", "INCOME"]),
        ("b.pmml", "INC01_NAME", &["Gender"]),
    ]);
    let run = run_pipeline(dir.path(), &Settings::default().run_options()).unwrap();

    assert!(run.has_errors());
    assert_eq!(run.combine_failures.len(), 1);
    assert_eq!(run.combine_failures[0].card(), "INC00_NAME");
    assert_eq!(run.cards[0].status, CardStatus::Rejected);
    assert_eq!(run.cards[0].combined, None);
    assert!(run.cards[0].errors >= 2);
    assert_eq!(run.cards[1].status, CardStatus::Rendered);
    assert_eq!(run.report.kind_count(DiagnosticKind::MissingType), 1);
    assert_eq!(run.report.kind_count(DiagnosticKind::CardRejected), 1);
}

#[test]
fn test_skip_policy_keeps_the_card() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["age", "INCOME"])]);
    let settings = Settings {
        missing_type: Some(MissingPolicy::Skip),
        ..Settings::default()
    };
    let run = run_pipeline(dir.path(), &settings.run_options()).unwrap();

    assert!(run.combine_failures.is_empty());
    assert_eq!(run.cards[0].status, CardStatus::Rendered);
    assert_eq!(run.cards[0].combined, Some(1));
    assert_eq!(run.cards[0].warnings, 1);
    assert_eq!(run.report.kind_count(DiagnosticKind::ParameterSkipped), 1);
}

#[test]
fn test_ambiguous_method_is_rendered_with_marker() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["LIMIT"])]);
    let run = run_pipeline(dir.path(), &Settings::default().run_options()).unwrap();

    assert!(run.has_errors());
    assert_eq!(run.cards[0].ambiguous, 1);
    assert_eq!(run.cards[0].status, CardStatus::Rendered);
    assert!(
        run.rendered[0]
            .section(Section::RuntimeLogic)
            .contains("<<AMBIGUOUS: m1 | m2>>")
    );
}

#[test]
fn test_settings_file_in_input_dir_is_used() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["age"])]);
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        "report_fields = \"advanced\"\nreport_line_start = 40\n",
    )
    .unwrap();

    let settings = resolve_settings(None, dir.path()).unwrap();
    assert_eq!(settings.report_fields, Some(ReportFieldsLayout::Advanced));
    let run = run_pipeline(dir.path(), &settings.run_options()).unwrap();
    let fields = run.rendered[0].section(Section::ReportFields);
    assert!(fields.lines().next().unwrap().ends_with(";1;1;1;41"));
}

#[test]
fn test_line_number_overflow_fails_only_rendering() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["age"])]);
    let settings = Settings {
        report_fields: Some(ReportFieldsLayout::Advanced),
        report_line_start: Some(u32::MAX - 2),
        ..Settings::default()
    };
    let run = run_pipeline(dir.path(), &settings.run_options()).unwrap();

    assert!(run.has_errors());
    assert!(run.rendered.is_empty());
    assert_eq!(run.render_failures.len(), 1);
    assert_eq!(run.cards[0].status, CardStatus::RenderFailed);
    assert_eq!(run.cards[0].combined, Some(1));
}

#[test]
fn test_missing_pmml_is_fatal() {
    let dir = fixture_dir(&[]);
    assert!(run_pipeline(dir.path(), &Settings::default().run_options()).is_err());
}

#[test]
fn test_lookup_reports_both_sources() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["age"])]);
    let (result, report) = lookup_parameter(dir.path(), "Limit").unwrap();

    assert!(report.is_empty());
    assert_eq!(result.declarations.len(), 1);
    assert_eq!(result.declarations[0].name, "LIMIT");
    assert_eq!(result.headers, vec!["Var_Name", "OMDM Data_Method"]);
    let methods: Vec<_> = result
        .rows
        .iter()
        .map(|row| row.method.as_deref().unwrap())
        .collect();
    assert_eq!(methods, vec!["m1", "m2"]);
}

#[test]
fn test_lookup_of_unknown_name_is_empty() {
    let dir = fixture_dir(&[("a.pmml", "INC00_NAME", &["age"])]);
    let (result, _) = lookup_parameter(dir.path(), "NOPE").unwrap();
    assert!(result.declarations.is_empty());
    assert!(result.rows.is_empty());
}
