//! PMML score card extraction.
//!
//! PMML files are read line by line. Every line carrying a field declaration
//! is parsed as one complete XML element; the model declaration line names
//! the card. Bad lines are reported and skipped without failing the file.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use scorecard_model::{Diagnostic, DiagnosticKind, RawParameter, Reporter, ScoreCard};

use crate::discovery::read_text;
use crate::error::{IngestError, InputKind, Result};

const FIELD_MARKER: &str = "<DataField";
const FIELD_TYPE_MARKER: &str = "dataType=\"";
const MODEL_MARKERS: &[&str] = &["<RegressionModel", "<Scorecard", "<MiningModel", "<TreeModel"];
const MODEL_NAME_MARKER: &str = "modelName=\"";

/// All score cards declared by a batch of PMML files.
#[derive(Debug, Clone)]
pub struct PmmlExtractor {
    cards: Vec<ScoreCard>,
}

impl PmmlExtractor {
    /// Reads every PMML file, in order.
    ///
    /// An empty path list is fatal. A file that cannot be read is reported
    /// and contributes no card.
    pub fn load(paths: &[PathBuf], reporter: &mut dyn Reporter) -> Result<Self> {
        if paths.is_empty() {
            return Err(IngestError::MissingInput {
                kind: InputKind::Pmml,
            });
        }

        let mut cards = Vec::with_capacity(paths.len());
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        for path in paths {
            match read_text(path) {
                Ok(content) => {
                    let card = parse_pmml(path, &content, reporter);
                    if let Some(first) = seen.get(&card.score_name) {
                        reporter.report(
                            Diagnostic::warning(
                                DiagnosticKind::PmmlDuplicateCardName,
                                format!(
                                    "card name '{}' is also declared in {}; per-card counts are shared",
                                    card.score_name,
                                    first.display()
                                ),
                            )
                            .in_file(path)
                            .for_card(card.score_name.as_str()),
                        );
                    } else {
                        seen.insert(card.score_name.clone(), path.clone());
                    }
                    cards.push(card);
                }
                Err(error) => reporter.report(
                    Diagnostic::error(
                        DiagnosticKind::PmmlUnreadable,
                        format!("cannot read PMML file: {error}"),
                    )
                    .in_file(path),
                ),
            }
        }

        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[ScoreCard] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<ScoreCard> {
        self.cards
    }
}

/// Parses the text of one PMML file into a score card.
pub fn parse_pmml(source: &Path, content: &str, reporter: &mut dyn Reporter) -> ScoreCard {
    let mut score_name: Option<String> = None;
    let mut params = Vec::new();
    // Field lines usually precede the model line, so hold their
    // diagnostics until the card name is known.
    let mut pending = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if is_field_line(line) {
            match parse_field_element(line) {
                Ok(name) => params.push(name),
                Err(error) => pending.push(
                    Diagnostic::error(error.kind(), format!("skipping field declaration: {error}"))
                        .at(source, line_no),
                ),
            }
        }

        if score_name.is_none() && is_model_line(line) {
            score_name = model_name(line);
        }
    }

    let score_name = score_name.unwrap_or_else(|| {
        let fallback = source
            .file_stem()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("UNNAMED")
            .to_string();
        pending.push(
            Diagnostic::warning(
                DiagnosticKind::PmmlMissingModelName,
                format!("no modelName declaration, using file name '{fallback}'"),
            )
            .in_file(source),
        );
        fallback
    });

    for diagnostic in pending {
        reporter.report(diagnostic.for_card(score_name.as_str()));
    }

    tracing::debug!(
        source = %source.display(),
        score_name = %score_name,
        param_count = params.len(),
        "parsed PMML card"
    );

    ScoreCard::new(score_name, source).with_params(params)
}

fn is_field_line(line: &str) -> bool {
    line.contains(FIELD_MARKER) && line.contains(FIELD_TYPE_MARKER)
}

fn is_model_line(line: &str) -> bool {
    MODEL_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Value of the `modelName="…"` attribute on a model declaration line.
fn model_name(line: &str) -> Option<String> {
    let start = line.find(MODEL_NAME_MARKER)? + MODEL_NAME_MARKER.len();
    let rest = &line[start..];
    let end = rest.find('"')?;
    let name = rest[..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldLineError {
    Malformed(String),
    MissingName,
}

impl FieldLineError {
    fn kind(&self) -> DiagnosticKind {
        match self {
            FieldLineError::Malformed(_) => DiagnosticKind::PmmlMalformedLine,
            FieldLineError::MissingName => DiagnosticKind::PmmlMissingFieldName,
        }
    }
}

impl fmt::Display for FieldLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLineError::Malformed(reason) => write!(f, "not a well-formed element: {reason}"),
            FieldLineError::MissingName => f.write_str("no name attribute"),
        }
    }
}

/// Parses a line as exactly one XML element and returns its `name`.
fn parse_field_element(line: &str) -> std::result::Result<RawParameter, FieldLineError> {
    let mut reader = Reader::from_str(line.trim());
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut roots = 0usize;
    let mut name = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if depth == 0 {
                    roots += 1;
                    name = name_attribute(e)?;
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                if depth == 0 {
                    roots += 1;
                    name = name_attribute(e)?;
                }
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FieldLineError::Malformed("unexpected end tag".to_string()))?;
            }
            Ok(Event::Text(ref text)) if depth == 0 => {
                if text.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(FieldLineError::Malformed(
                        "text outside the element".to_string(),
                    ));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return Err(FieldLineError::Malformed(error.to_string())),
        }
    }

    if depth != 0 {
        return Err(FieldLineError::Malformed("unclosed element".to_string()));
    }
    if roots != 1 {
        return Err(FieldLineError::Malformed(format!(
            "expected one element, found {roots}"
        )));
    }

    let name = name.ok_or(FieldLineError::MissingName)?;
    RawParameter::new(name).map_err(|_| FieldLineError::MissingName)
}

fn name_attribute(element: &BytesStart<'_>) -> std::result::Result<Option<String>, FieldLineError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| FieldLineError::Malformed(e.to_string()))?;
        if attr.key.as_ref() == b"name" {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| FieldLineError::Malformed(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_model::DiagnosticReport;

    const CARD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PMML version="4.2" xmlns="http://www.dmg.org/PMML-4_2">
  <DataDictionary numberOfFields="4">
    <DataField dataType="double" name="AGE" optype="continuous"/>
    <DataField dataType="string" name="GENDER" optype="categorical"/>
    <DataField dataType="double" name="BROKEN" optype="continuous">
    <DataField dataType="double" name="LIMIT" optype="continuous"/>
  </DataDictionary>
  <RegressionModel functionName="classification" modelName="INC00_NAME" normalizationMethod="logit">
    <MiningSchema>
      <MiningField name="AGE"/>
    </MiningSchema>
  </RegressionModel>
</PMML>
"#;

    fn names(card: &ScoreCard) -> Vec<&str> {
        card.params.iter().map(RawParameter::as_str).collect()
    }

    #[test]
    fn test_parse_pmml_keeps_valid_fields_in_order() {
        let mut report = DiagnosticReport::new();
        let card = parse_pmml(Path::new("card.pmml"), CARD, &mut report);

        assert_eq!(card.score_name, "INC00_NAME");
        assert_eq!(names(&card), vec!["AGE", "GENDER", "LIMIT"]);
        assert_eq!(report.kind_count(DiagnosticKind::PmmlMalformedLine), 1);
        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.line, Some(6));
        assert_eq!(diagnostic.card.as_deref(), Some("INC00_NAME"));
    }

    #[test]
    fn test_parse_field_element() {
        assert_eq!(
            parse_field_element(r#"  <DataField dataType="double" name="AGE"/>  "#)
                .unwrap()
                .as_str(),
            "AGE"
        );
        assert_eq!(
            parse_field_element(r#"<DataField dataType="double" name="A&amp;B"></DataField>"#)
                .unwrap()
                .as_str(),
            "A&B"
        );
        assert_eq!(
            parse_field_element(r#"<DataField dataType="double"/>"#),
            Err(FieldLineError::MissingName)
        );
        assert!(matches!(
            parse_field_element(r#"<DataField dataType="double" name="X"><Value/>"#),
            Err(FieldLineError::Malformed(_))
        ));
        assert!(matches!(
            parse_field_element(r#"<DataField dataType="double" name="X"/><DataField name="Y"/>"#),
            Err(FieldLineError::Malformed(_))
        ));
    }

    #[test]
    fn test_model_name_uses_first_declaration() {
        let content = r#"<DataField dataType="double" name="AGE"/>
<Scorecard modelName="FIRST" functionName="regression">
<RegressionModel functionName="regression" modelName="SECOND">"#;
        let mut report = DiagnosticReport::new();
        let card = parse_pmml(Path::new("card.pmml"), content, &mut report);
        assert_eq!(card.score_name, "FIRST");
        assert!(report.is_empty());
    }

    #[test]
    fn test_missing_model_name_falls_back_to_file_stem() {
        let content = r#"<DataField dataType="double" name="AGE"/>"#;
        let mut report = DiagnosticReport::new();
        let card = parse_pmml(Path::new("/cards/INC07.pmml"), content, &mut report);
        assert_eq!(card.score_name, "INC07");
        assert_eq!(report.kind_count(DiagnosticKind::PmmlMissingModelName), 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_duplicate_fields_are_kept() {
        let content = r#"<RegressionModel modelName="DUP">
<DataField dataType="double" name="AGE"/>
<DataField dataType="double" name="AGE"/>"#;
        let mut report = DiagnosticReport::new();
        let card = parse_pmml(Path::new("dup.pmml"), content, &mut report);
        assert_eq!(names(&card), vec!["AGE", "AGE"]);
    }

    #[test]
    fn test_invalid_utf8_only_affects_its_own_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("card.pmml");
        let mut bytes = b"<!-- \xcf\xf0\xee\xe2\xe5\xf0\xea\xe0 -->\n".to_vec();
        bytes.extend_from_slice(
            br#"<DataField dataType="double" name="AGE"/>
<DataField dataType="string" name="GENDER"/>
<RegressionModel modelName="INC00_NAME">
"#,
        );
        std::fs::write(&path, bytes).unwrap();

        let mut report = DiagnosticReport::new();
        let extractor = PmmlExtractor::load(&[path], &mut report).unwrap();
        assert_eq!(extractor.cards().len(), 1);
        assert_eq!(names(&extractor.cards()[0]), vec!["AGE", "GENDER"]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_shared_card_name_is_flagged() {
        let dir = tempfile::TempDir::new().unwrap();
        let content = r#"<RegressionModel modelName="INC00_NAME">
<DataField dataType="double" name="AGE"/>"#;
        let paths: Vec<PathBuf> = ["a.pmml", "b.pmml"]
            .iter()
            .map(|file| dir.path().join(file))
            .collect();
        for path in &paths {
            std::fs::write(path, content).unwrap();
        }

        let mut report = DiagnosticReport::new();
        let extractor = PmmlExtractor::load(&paths, &mut report).unwrap();
        assert_eq!(extractor.cards().len(), 2);
        assert_eq!(report.kind_count(DiagnosticKind::PmmlDuplicateCardName), 1);
        assert_eq!(report.diagnostics[0].source.as_deref(), Some(paths[1].as_path()));
        assert!(!report.has_errors());
    }

    #[test]
    fn test_load_rejects_empty_path_list() {
        let mut report = DiagnosticReport::new();
        assert!(matches!(
            PmmlExtractor::load(&[], &mut report),
            Err(IngestError::MissingInput {
                kind: InputKind::Pmml
            })
        ));
    }
}
